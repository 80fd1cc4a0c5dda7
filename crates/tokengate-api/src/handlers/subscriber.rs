//! Subscriber auth handlers. Subscribers log in with mobile number and PIN.

use axum::Json;
use axum::extract::State;

use tokengate_core::types::PrincipalType;

use super::auth::{login_as, refresh_as};
use crate::dto::request::{RefreshTokenRequest, SubscriberLoginRequest, validated};
use crate::dto::response::{LoginResponse, RefreshTokenResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/subscriber/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<SubscriberLoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let req = validated(req)?;
    login_as(&state, &req.mobile_number, &req.pin, PrincipalType::Subscriber).await
}

/// POST /api/subscriber/auth/refresh-token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<RefreshTokenResponse>> {
    refresh_as(&state, req, PrincipalType::Subscriber).await
}
