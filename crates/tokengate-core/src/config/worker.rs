//! Background sweep configuration.

use serde::{Deserialize, Serialize};

/// Cron schedules for the token store sweeps.
///
/// Expressions use the six-field `sec min hour day month weekday` form
/// understood by `tokio-cron-scheduler`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduler is started at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Schedule for dropping blacklist entries past their token expiry.
    #[serde(default = "default_blacklist_prune_cron")]
    pub blacklist_prune_cron: String,
    /// Schedule for deleting expired refresh tokens.
    #[serde(default = "default_refresh_purge_cron")]
    pub refresh_purge_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            blacklist_prune_cron: default_blacklist_prune_cron(),
            refresh_purge_cron: default_refresh_purge_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_blacklist_prune_cron() -> String {
    "0 */15 * * * *".to_string()
}

fn default_refresh_purge_cron() -> String {
    "0 0 5 * * *".to_string()
}
