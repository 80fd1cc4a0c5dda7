//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tokengate_auth::TokenPair;
use tokengate_core::types::CanonicalPrincipal;

/// Login response: the access token as `jwt` plus its refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub jwt: String,
    pub refresh_token: String,
}

/// Refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for LoginResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            jwt: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

impl From<TokenPair> for RefreshTokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Logout result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub message: String,
    pub refresh_tokens_revoked: u64,
}

/// The authenticated principal as seen by the gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalResponse {
    /// Username or mobile number.
    pub username: String,
    /// `SUPER_ADMIN`, `ENTITY_ADMIN` or `SUBSCRIBER`.
    pub principal_type: String,
    /// Role label (`MEMBER` for subscribers).
    pub role: String,
    /// `ROLE_<TYPE>`.
    pub authority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriber_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl From<&CanonicalPrincipal> for PrincipalResponse {
    fn from(principal: &CanonicalPrincipal) -> Self {
        Self {
            username: principal.username.clone(),
            principal_type: principal.principal_type.as_str().to_string(),
            role: principal.role_label().to_string(),
            authority: principal.authority(),
            organization_id: principal.organization_id,
            subscriber_id: principal.subscriber_id,
            entity_id: principal.entity_id.clone(),
        }
    }
}

/// Token validation result for other services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTokenResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<PrincipalResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Failure code (`EXPIRED`, `BLACKLISTED`, `MISSING_TOKEN`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidateTokenResponse {
    pub fn valid(principal: &CanonicalPrincipal, expires_at: DateTime<Utc>) -> Self {
        Self {
            valid: true,
            principal: Some(PrincipalResponse::from(principal)),
            expires_at: Some(expires_at),
            reason: None,
        }
    }

    pub fn invalid(reason: &str) -> Self {
        Self {
            valid: false,
            principal: None,
            expires_at: None,
            reason: Some(reason.to_string()),
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// `connected`, `unavailable`, or `memory`.
    pub store: String,
}
