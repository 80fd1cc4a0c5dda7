//! Revoked access token record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An access token revoked before its natural expiry.
///
/// Entries are only useful until `expires_at`; after that the token fails
/// the expiry check anyway and the sweep may drop the row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlacklistedToken {
    pub id: Uuid,
    /// SHA-256 hex digest of the access token string. Unique.
    pub token_hash: String,
    pub username: String,
    pub blacklisted_at: DateTime<Utc>,
    /// The revoked token's own `exp`.
    pub expires_at: DateTime<Utc>,
    /// Free-form reason, e.g. `logout`.
    pub reason: Option<String>,
}

impl BlacklistedToken {
    /// Whether the entry can be pruned as of `now`.
    pub fn is_prunable_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Data required to blacklist a token.
#[derive(Debug, Clone)]
pub struct CreateBlacklistedToken {
    pub token_hash: String,
    pub username: String,
    pub blacklisted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub reason: Option<String>,
}

impl CreateBlacklistedToken {
    /// Materializes the row the store will hold for this insert.
    pub fn into_record(self, id: Uuid) -> BlacklistedToken {
        BlacklistedToken {
            id,
            token_hash: self.token_hash,
            username: self.username,
            blacklisted_at: self.blacklisted_at,
            expires_at: self.expires_at,
            reason: self.reason,
        }
    }
}
