//! Removes blacklist entries whose token has expired anyway.

use async_trait::async_trait;
use tracing::info;

use tokengate_auth::TokenBlacklist;
use tokengate_core::result::AppResult;

use super::SweepJob;

/// Prunes the access token blacklist.
#[derive(Debug, Clone)]
pub struct BlacklistPruneJob {
    blacklist: TokenBlacklist,
}

impl BlacklistPruneJob {
    pub fn new(blacklist: TokenBlacklist) -> Self {
        Self { blacklist }
    }
}

#[async_trait]
impl SweepJob for BlacklistPruneJob {
    fn name(&self) -> &'static str {
        "blacklist_prune"
    }

    async fn run(&self) -> AppResult<u64> {
        let removed = self.blacklist.prune().await?;
        info!(job = self.name(), removed, "Blacklist pruned");
        Ok(removed)
    }
}
