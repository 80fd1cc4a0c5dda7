//! # tokengate-database
//!
//! Storage for refresh tokens and the access token blacklist. Each store is
//! a trait with a PostgreSQL implementation and an in-process `DashMap`
//! implementation; [`TokenStores`] picks one pair from configuration.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use repositories::{BlacklistRepository, RefreshTokenRepository};
pub use store::TokenStores;
