//! Token store entities.

pub mod blacklist;
pub mod refresh;

pub use blacklist::{BlacklistedToken, CreateBlacklistedToken};
pub use refresh::{CreateRefreshToken, RefreshToken};
