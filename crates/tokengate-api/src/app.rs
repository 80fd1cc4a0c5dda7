//! Application builder: wires state, router and middleware into an Axum app.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use tokengate_auth::{AuthServices, CredentialStore};
use tokengate_core::config::AppConfig;
use tokengate_core::error::AppError;
use tokengate_core::traits::Clock;
use tokengate_database::TokenStores;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the shared state from configuration and the chosen backends.
pub fn build_state(
    config: AppConfig,
    stores: TokenStores,
    credentials: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
) -> Result<AppState, AppError> {
    let auth = AuthServices::build(&config.auth, &stores, credentials, clock)?;
    Ok(AppState {
        config: Arc::new(config),
        stores,
        auth,
    })
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state).layer(TraceLayer::new_for_http())
}

/// Binds the configured address and serves until `shutdown` resolves.
pub async fn serve<F>(state: AppState, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = state.config.server.bind_address();
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("TokenGate server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}
