//! # tokengate-api
//!
//! HTTP API layer for TokenGate built on Axum.
//!
//! Provides the login, refresh, logout and introspection endpoints, the
//! authorization gate middleware, role guards, extractors, DTOs, and error
//! mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state};
pub use state::AppState;
