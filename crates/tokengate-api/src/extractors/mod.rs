//! Custom Axum extractors.

pub mod auth;

pub use auth::{AuthPrincipal, AuthSession, BearerToken, TokenStatus};
