//! Background sweeps for TokenGate.
//!
//! This crate provides:
//! - A cron scheduler that runs each sweep on its configured schedule
//! - The sweeps themselves: blacklist pruning and expired refresh token purging

pub mod jobs;
pub mod scheduler;

pub use jobs::{BlacklistPruneJob, RefreshTokenPurgeJob, SweepJob};
pub use scheduler::CronScheduler;
