//! In-process token stores backed by `DashMap`.
//!
//! Used for single-node deployments without PostgreSQL and throughout the
//! test suites. State does not survive a restart.

pub mod blacklist;
pub mod refresh_token;

pub use blacklist::MemoryBlacklistRepository;
pub use refresh_token::MemoryRefreshTokenRepository;
