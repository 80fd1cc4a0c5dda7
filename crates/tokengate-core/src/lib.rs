//! # tokengate-core
//!
//! Core crate for TokenGate. Contains the layered configuration schema,
//! the principal type model shared by every scheme, the injectable clock,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other TokenGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
