//! Persisted refresh token record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tokengate_core::types::PrincipalType;
use uuid::Uuid;

/// A stored refresh token.
///
/// `token_value` holds the SHA-256 hex digest of the issued token string,
/// never the token itself. A row exists from issue until it is rotated,
/// revoked, or purged after expiry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    /// Row identifier.
    pub id: Uuid,
    /// SHA-256 hex digest of the refresh token string. Unique.
    pub token_value: String,
    /// Subject of the token.
    pub username: String,
    /// Scheme the token was signed under.
    pub principal_type: PrincipalType,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Issue time.
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Whether the record has expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Data required to store a newly issued refresh token.
#[derive(Debug, Clone)]
pub struct CreateRefreshToken {
    /// SHA-256 hex digest of the refresh token string.
    pub token_value: String,
    /// Subject of the token.
    pub username: String,
    /// Scheme the token was signed under.
    pub principal_type: PrincipalType,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Issue time.
    pub created_at: DateTime<Utc>,
}

impl CreateRefreshToken {
    /// Materializes the row the store will hold for this insert.
    pub fn into_record(self, id: Uuid) -> RefreshToken {
        RefreshToken {
            id,
            token_value: self.token_value,
            username: self.username,
            principal_type: self.principal_type,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}
