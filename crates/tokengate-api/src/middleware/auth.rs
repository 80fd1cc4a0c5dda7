//! The authorization gate: resolves a bearer token to a principal once per
//! request.
//!
//! The gate never rejects a request on its own. A missing, malformed,
//! expired, blacklisted or unrecognized token leaves the request
//! unauthenticated and the handler decides; see
//! [`AuthPrincipal`](crate::extractors::AuthPrincipal) for the 401 path.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use tracing::{debug, error};

use tokengate_auth::{AuthResult, Authenticated};
use tokengate_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::BearerToken;
use crate::state::AppState;

/// The `ROLE_<TYPE>` authority attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantedAuthority(pub String);

/// Validates `Authorization: Bearer <token>` and, on success, attaches the
/// [`CanonicalPrincipal`](tokengate_core::types::CanonicalPrincipal), its
/// [`GrantedAuthority`], the [`Authenticated`] result and the raw
/// [`BearerToken`] to the request extensions. A rejected token leaves its
/// [`AuthFailure`](tokengate_auth::AuthFailure) there instead.
///
/// A request that is already authenticated passes straight through. A
/// backing store failure is answered with a generic 500.
pub async fn authorization_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.extensions().get::<Authenticated>().is_some() {
        return next.run(request).await;
    }

    let Some(token) = bearer_token(request.headers()) else {
        return next.run(request).await;
    };

    match state.auth.validator.validate(&token).await {
        Ok(AuthResult::Valid(authenticated)) => {
            let principal = authenticated.principal.clone();
            let extensions = request.extensions_mut();
            extensions.insert(GrantedAuthority(principal.authority()));
            extensions.insert(principal);
            extensions.insert(authenticated);
            extensions.insert(BearerToken(token));
        }
        Ok(AuthResult::Invalid(reason)) => {
            debug!(
                reason = reason.as_code(),
                path = %request.uri().path(),
                "Bearer token rejected"
            );
            request.extensions_mut().insert(reason);
        }
        Err(e) => {
            error!(error = %e, "Token validation unavailable");
            return ApiError::from(AppError::internal("Token validation unavailable")).into_response();
        }
    }

    next.run(request).await
}

/// The token from a well-formed `Bearer` authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.typed_get::<Authorization<Bearer>>()?;
    let token = header.token().trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
