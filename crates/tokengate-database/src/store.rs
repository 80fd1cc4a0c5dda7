//! Backend selection for the token stores.

use std::sync::Arc;

use tracing::info;

use tokengate_core::config::{DatabaseBackend, DatabaseConfig};
use tokengate_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{MemoryBlacklistRepository, MemoryRefreshTokenRepository};
use crate::repositories::{
    BlacklistRepository, PgBlacklistRepository, PgRefreshTokenRepository, RefreshTokenRepository,
};

/// The refresh token store and blacklist store for one backend.
#[derive(Debug, Clone)]
pub struct TokenStores {
    /// Refresh token records.
    pub refresh_tokens: Arc<dyn RefreshTokenRepository>,
    /// Revoked access tokens.
    pub blacklist: Arc<dyn BlacklistRepository>,
    /// Present only for the postgres backend.
    pub pool: Option<DatabasePool>,
}

impl TokenStores {
    /// Builds the stores for the configured backend.
    pub async fn from_config(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            DatabaseBackend::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                Ok(Self::postgres(pool))
            }
            DatabaseBackend::Memory => {
                info!("Using in-memory token stores");
                Ok(Self::memory())
            }
        }
    }

    /// Stores backed by an open PostgreSQL pool.
    pub fn postgres(pool: DatabasePool) -> Self {
        Self {
            refresh_tokens: Arc::new(PgRefreshTokenRepository::new(pool.pool().clone())),
            blacklist: Arc::new(PgBlacklistRepository::new(pool.pool().clone())),
            pool: Some(pool),
        }
    }

    /// Fresh, empty in-process stores.
    pub fn memory() -> Self {
        Self {
            refresh_tokens: Arc::new(MemoryRefreshTokenRepository::new()),
            blacklist: Arc::new(MemoryBlacklistRepository::new()),
            pool: None,
        }
    }

    /// Whether the backing store is reachable. Always true in memory.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Releases backend resources.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
