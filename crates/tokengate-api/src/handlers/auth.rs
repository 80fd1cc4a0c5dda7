//! Admin auth handlers (login, refresh) and the shared logout and me.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;

use tokengate_core::types::PrincipalType;

use crate::dto::request::{LoginRequest, LogoutRequest, RefreshTokenRequest, validated};
use crate::dto::response::{
    LoginResponse, LogoutResponse, PrincipalResponse, RefreshTokenResponse, ValidateTokenResponse,
};
use crate::error::ApiResult;
use crate::extractors::{AuthPrincipal, AuthSession, TokenStatus};
use crate::state::AppState;

pub(crate) async fn login_as(
    state: &AppState,
    username: &str,
    password: &str,
    principal_type: PrincipalType,
) -> ApiResult<Json<LoginResponse>> {
    let pair = state
        .auth
        .sessions
        .login(username, password, principal_type)
        .await?;
    Ok(Json(pair.into()))
}

pub(crate) async fn refresh_as(
    state: &AppState,
    req: RefreshTokenRequest,
    principal_type: PrincipalType,
) -> ApiResult<Json<RefreshTokenResponse>> {
    let req = validated(req)?;
    let pair = state
        .auth
        .sessions
        .refresh(&req.refresh_token, principal_type)
        .await?;
    Ok(Json(pair.into()))
}

/// POST /api/auth/super-admin/login
pub async fn super_admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let req = validated(req)?;
    login_as(&state, &req.username, &req.password, PrincipalType::SuperAdmin).await
}

/// POST /api/auth/super-admin/refresh-token
pub async fn super_admin_refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<RefreshTokenResponse>> {
    refresh_as(&state, req, PrincipalType::SuperAdmin).await
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let req = validated(req)?;
    login_as(&state, &req.username, &req.password, PrincipalType::EntityAdmin).await
}

/// POST /api/auth/refresh-token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<RefreshTokenResponse>> {
    refresh_as(&state, req, PrincipalType::EntityAdmin).await
}

/// POST /api/auth/logout
///
/// Any principal type. The body is optional.
pub async fn logout(
    State(state): State<AppState>,
    session: AuthSession,
    body: Bytes,
) -> ApiResult<Json<LogoutResponse>> {
    let req = LogoutRequest::from_body(&body)?;
    let outcome = state
        .auth
        .sessions
        .logout(
            &session.authenticated,
            &session.token,
            req.refresh_token.as_deref(),
        )
        .await?;

    Ok(Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
        refresh_tokens_revoked: outcome.refresh_tokens_revoked,
    }))
}

/// GET /api/auth/me
pub async fn me(auth: AuthPrincipal) -> Json<PrincipalResponse> {
    Json(PrincipalResponse::from(auth.principal()))
}

/// POST /api/auth/validate
///
/// Reports whether the bearer token is valid, and for whom. Always 200;
/// the verdict is in the body.
pub async fn validate(status: TokenStatus) -> Json<ValidateTokenResponse> {
    Json(match status {
        TokenStatus::Valid(auth) => ValidateTokenResponse::valid(&auth.principal, auth.expires_at),
        TokenStatus::Invalid(reason) => ValidateTokenResponse::invalid(reason.as_code()),
        TokenStatus::Missing => ValidateTokenResponse::invalid("MISSING_TOKEN"),
    })
}
