//! Axum middleware stack.

pub mod auth;
pub mod logging;
pub mod rbac;

pub use auth::{GrantedAuthority, authorization_gate};
pub use rbac::{require_any_role, require_role};
