//! Extractors over what the authorization gate attached to the request.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use tokengate_auth::{AuthFailure, Authenticated};
use tokengate_core::error::AppError;
use tokengate_core::types::CanonicalPrincipal;

use crate::error::ApiError;

/// The raw bearer token of an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

/// The authenticated principal. Rejects with 401 when the gate left the
/// request unauthenticated.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub CanonicalPrincipal);

impl AuthPrincipal {
    /// Returns the inner principal.
    pub fn principal(&self) -> &CanonicalPrincipal {
        &self.0
    }
}

impl std::ops::Deref for AuthPrincipal {
    type Target = CanonicalPrincipal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CanonicalPrincipal>()
            .cloned()
            .map(AuthPrincipal)
            .ok_or_else(unauthenticated)
    }
}

/// The validation result together with the token it came from, for flows
/// that act on the token itself (logout).
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub authenticated: Authenticated,
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authenticated = parts
            .extensions
            .get::<Authenticated>()
            .cloned()
            .ok_or_else(unauthenticated)?;
        let BearerToken(token) = parts
            .extensions
            .get::<BearerToken>()
            .cloned()
            .ok_or_else(unauthenticated)?;
        Ok(Self {
            authenticated,
            token,
        })
    }
}

/// What the gate concluded about the request's bearer token. Never rejects.
#[derive(Debug, Clone)]
pub enum TokenStatus {
    Valid(Authenticated),
    Invalid(AuthFailure),
    /// No `Authorization: Bearer` header.
    Missing,
}

impl<S> FromRequestParts<S> for TokenStatus
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(authenticated) = parts.extensions.get::<Authenticated>() {
            return Ok(Self::Valid(authenticated.clone()));
        }
        Ok(parts
            .extensions
            .get::<AuthFailure>()
            .copied()
            .map_or(Self::Missing, Self::Invalid))
    }
}

fn unauthenticated() -> ApiError {
    AppError::unauthorized("Full authentication is required to access this resource")
        .with_code("UNAUTHENTICATED")
        .into()
}
