//! Sweep jobs.

pub mod blacklist;
pub mod refresh;

use async_trait::async_trait;

use tokengate_core::result::AppResult;

pub use blacklist::BlacklistPruneJob;
pub use refresh::RefreshTokenPurgeJob;

/// A periodic cleanup over one store.
#[async_trait]
pub trait SweepJob: Send + Sync + std::fmt::Debug {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Runs one sweep and returns the number of records removed.
    async fn run(&self) -> AppResult<u64>;
}
