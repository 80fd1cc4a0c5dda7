//! Deletes refresh token records past their expiry.

use async_trait::async_trait;
use tracing::info;

use tokengate_auth::RefreshTokenStore;
use tokengate_core::result::AppResult;

use super::SweepJob;

/// Purges expired refresh tokens. Rotation deletes expired rows lazily; this
/// catches the ones nobody presents again.
#[derive(Debug, Clone)]
pub struct RefreshTokenPurgeJob {
    refresh_tokens: RefreshTokenStore,
}

impl RefreshTokenPurgeJob {
    pub fn new(refresh_tokens: RefreshTokenStore) -> Self {
        Self { refresh_tokens }
    }
}

#[async_trait]
impl SweepJob for RefreshTokenPurgeJob {
    fn name(&self) -> &'static str {
        "refresh_token_purge"
    }

    async fn run(&self) -> AppResult<u64> {
        let removed = self.refresh_tokens.purge_expired().await?;
        info!(job = self.name(), removed, "Refresh tokens purged");
        Ok(removed)
    }
}
