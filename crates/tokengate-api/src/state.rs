//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use tokengate_auth::AuthServices;
use tokengate_core::config::AppConfig;
use tokengate_database::TokenStores;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token stores, for health reporting
    pub stores: TokenStores,
    /// Validator, issuer, rotation, blacklist and session flows
    pub auth: AuthServices,
}
