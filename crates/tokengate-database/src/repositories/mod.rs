//! Token store traits and their PostgreSQL implementations.

pub mod blacklist;
pub mod refresh_token;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use tokengate_core::result::AppResult;
use tokengate_core::types::PrincipalType;
use tokengate_entity::token::{CreateBlacklistedToken, CreateRefreshToken, RefreshToken};

pub use blacklist::PgBlacklistRepository;
pub use refresh_token::PgRefreshTokenRepository;

/// Persistence for refresh token records keyed by token digest.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Looks up a record by the digest of its token string.
    async fn find_by_token_value(&self, token_value: &str) -> AppResult<Option<RefreshToken>>;

    /// Stores a new record.
    async fn create(&self, data: &CreateRefreshToken) -> AppResult<RefreshToken>;

    /// Atomically removes the record for `old_token_value` and stores `data`.
    ///
    /// Returns `None` without storing anything when the old record is already
    /// gone. Of any number of concurrent calls naming the same old record, at
    /// most one returns `Some`.
    async fn replace(
        &self,
        old_token_value: &str,
        data: &CreateRefreshToken,
    ) -> AppResult<Option<RefreshToken>>;

    /// Deletes one record. Returns `true` if it existed.
    async fn delete_by_token_value(&self, token_value: &str) -> AppResult<bool>;

    /// Deletes every record owned by the given subject.
    async fn delete_by_owner(
        &self,
        username: &str,
        principal_type: PrincipalType,
    ) -> AppResult<u64>;

    /// Counts records owned by the given subject.
    async fn count_by_owner(&self, username: &str, principal_type: PrincipalType)
    -> AppResult<u64>;

    /// Deletes every record with `expires_at <= now`.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Persistence for revoked access token digests.
#[async_trait]
pub trait BlacklistRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Records a revoked token. Returns `false` if the digest was already present.
    async fn insert(&self, data: &CreateBlacklistedToken) -> AppResult<bool>;

    /// Whether the digest is blacklisted.
    async fn exists(&self, token_hash: &str) -> AppResult<bool>;

    /// Drops entries whose token has expired as of `now`.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}
