//! PostgreSQL blacklist repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use tokengate_core::error::{AppError, ErrorKind};
use tokengate_core::result::AppResult;
use tokengate_entity::token::CreateBlacklistedToken;

use super::BlacklistRepository;

/// Revoked access tokens in the `blacklisted_tokens` table.
#[derive(Debug, Clone)]
pub struct PgBlacklistRepository {
    pool: PgPool,
}

impl PgBlacklistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlacklistRepository for PgBlacklistRepository {
    async fn insert(&self, data: &CreateBlacklistedToken) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO blacklisted_tokens \
             (id, token_hash, username, blacklisted_at, expires_at, reason) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (token_hash) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(&data.token_hash)
        .bind(&data.username)
        .bind(data.blacklisted_at)
        .bind(data.expires_at)
        .bind(&data.reason)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to blacklist token", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, token_hash: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM blacklisted_tokens WHERE token_hash = $1)",
        )
        .bind(token_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check blacklist", e))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM blacklisted_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to prune blacklist", e)
            })?;
        Ok(result.rows_affected())
    }
}
