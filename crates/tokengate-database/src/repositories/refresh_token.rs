//! PostgreSQL refresh token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use tokengate_core::error::{AppError, ErrorKind};
use tokengate_core::result::AppResult;
use tokengate_core::types::PrincipalType;
use tokengate_entity::token::{CreateRefreshToken, RefreshToken};

use super::RefreshTokenRepository;

const INSERT_SQL: &str = "INSERT INTO refresh_tokens \
     (id, token_value, username, principal_type, expires_at, created_at) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING *";

/// Refresh tokens in the `refresh_tokens` table.
#[derive(Debug, Clone)]
pub struct PgRefreshTokenRepository {
    pool: PgPool,
}

impl PgRefreshTokenRepository {
    /// Create a new refresh token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RefreshTokenRepository for PgRefreshTokenRepository {
    async fn find_by_token_value(&self, token_value: &str) -> AppResult<Option<RefreshToken>> {
        sqlx::query_as::<_, RefreshToken>("SELECT * FROM refresh_tokens WHERE token_value = $1")
            .bind(token_value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find refresh token", e)
            })
    }

    async fn create(&self, data: &CreateRefreshToken) -> AppResult<RefreshToken> {
        sqlx::query_as::<_, RefreshToken>(INSERT_SQL)
            .bind(Uuid::new_v4())
            .bind(&data.token_value)
            .bind(&data.username)
            .bind(data.principal_type)
            .bind(data.expires_at)
            .bind(data.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to store refresh token", e)
            })
    }

    async fn replace(
        &self,
        old_token_value: &str,
        data: &CreateRefreshToken,
    ) -> AppResult<Option<RefreshToken>> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin rotation", e)
        })?;

        // The row lock taken by DELETE serializes concurrent rotations; a
        // loser re-evaluates after the winner commits and deletes nothing.
        let deleted = sqlx::query("DELETE FROM refresh_tokens WHERE token_value = $1")
            .bind(old_token_value)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to consume refresh token", e)
            })?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to roll back rotation", e)
            })?;
            return Ok(None);
        }

        let stored = sqlx::query_as::<_, RefreshToken>(INSERT_SQL)
            .bind(Uuid::new_v4())
            .bind(&data.token_value)
            .bind(&data.username)
            .bind(data.principal_type)
            .bind(data.expires_at)
            .bind(data.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to store rotated token", e)
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit rotation", e)
        })?;

        Ok(Some(stored))
    }

    async fn delete_by_token_value(&self, token_value: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token_value = $1")
            .bind(token_value)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete refresh token", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_owner(
        &self,
        username: &str,
        principal_type: PrincipalType,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM refresh_tokens WHERE username = $1 AND principal_type = $2",
        )
        .bind(username)
        .bind(principal_type)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete user refresh tokens", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn count_by_owner(
        &self,
        username: &str,
        principal_type: PrincipalType,
    ) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM refresh_tokens WHERE username = $1 AND principal_type = $2",
        )
        .bind(username)
        .bind(principal_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count refresh tokens", e)
        })?;
        Ok(count.max(0) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to purge expired refresh tokens",
                    e,
                )
            })?;
        Ok(result.rows_affected())
    }
}
