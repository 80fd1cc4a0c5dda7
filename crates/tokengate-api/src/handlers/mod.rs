//! Route handlers organized by principal.

pub mod admin;
pub mod auth;
pub mod health;
pub mod subscriber;
