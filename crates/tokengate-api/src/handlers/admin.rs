//! Super admin only endpoints.

use axum::Json;

use tokengate_core::types::PrincipalType;

use crate::dto::response::MessageResponse;
use crate::error::ApiResult;
use crate::extractors::AuthPrincipal;
use crate::middleware::require_role;

/// GET /api/admin/ping
pub async fn ping(auth: AuthPrincipal) -> ApiResult<Json<MessageResponse>> {
    require_role(&auth, PrincipalType::SuperAdmin)?;
    Ok(Json(MessageResponse {
        message: format!("pong, {}", auth.username),
    }))
}
