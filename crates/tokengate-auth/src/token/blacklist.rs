//! Revocation list for access tokens.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use tokengate_core::result::AppResult;
use tokengate_core::traits::Clock;
use tokengate_database::BlacklistRepository;
use tokengate_entity::token::CreateBlacklistedToken;

use super::{hash_prefix, hash_token};

/// Access tokens revoked before their natural expiry, keyed by digest.
///
/// An entry outlives its token's `exp` by the codec's leeway, so a pruned
/// token is already rejected as expired.
#[derive(Debug, Clone)]
pub struct TokenBlacklist {
    repo: Arc<dyn BlacklistRepository>,
    clock: Arc<dyn Clock>,
    leeway: Duration,
}

impl TokenBlacklist {
    pub fn new(repo: Arc<dyn BlacklistRepository>, clock: Arc<dyn Clock>, leeway: Duration) -> Self {
        Self { repo, clock, leeway }
    }

    /// Blacklists a token digest until `original_expiry`.
    ///
    /// Returns `false` if the digest was already listed.
    pub async fn add(
        &self,
        token_hash: &str,
        username: &str,
        original_expiry: DateTime<Utc>,
        reason: Option<&str>,
    ) -> AppResult<bool> {
        let inserted = self
            .repo
            .insert(&CreateBlacklistedToken {
                token_hash: token_hash.to_string(),
                username: username.to_string(),
                blacklisted_at: self.clock.now(),
                expires_at: original_expiry,
                reason: reason.map(str::to_string),
            })
            .await?;

        if inserted {
            info!(
                username,
                token = hash_prefix(token_hash),
                reason = reason.unwrap_or("-"),
                "Access token blacklisted"
            );
        } else {
            debug!(token = hash_prefix(token_hash), "Access token already blacklisted");
        }
        Ok(inserted)
    }

    /// Hashes `token` and blacklists it.
    pub async fn revoke_token(
        &self,
        token: &str,
        username: &str,
        original_expiry: DateTime<Utc>,
        reason: Option<&str>,
    ) -> AppResult<bool> {
        self.add(&hash_token(token), username, original_expiry, reason)
            .await
    }

    /// Whether a digest is listed.
    pub async fn contains(&self, token_hash: &str) -> AppResult<bool> {
        self.repo.exists(token_hash).await
    }

    /// Whether a raw token is listed.
    pub async fn contains_token(&self, token: &str) -> AppResult<bool> {
        self.contains(&hash_token(token)).await
    }

    /// Drops entries whose original token has expired, leeway included.
    /// Returns the count removed.
    pub async fn prune(&self) -> AppResult<u64> {
        let cutoff = self.clock.now() - self.leeway;
        let removed = self.repo.delete_expired(cutoff).await?;
        if removed > 0 {
            info!(removed, "Pruned expired blacklist entries");
        }
        Ok(removed)
    }
}
