//! Route definitions for the TokenGate HTTP API.
//!
//! All routes are mounted under `/api`. Every request passes the
//! authorization gate first; handlers that need a principal ask for one
//! through [`AuthPrincipal`](crate::extractors::AuthPrincipal).

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and the gate.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(super_admin_auth_routes())
        .merge(auth_routes())
        .merge(subscriber_auth_routes())
        .merge(admin_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::authorization_gate,
        ))
        .with_state(state)
}

/// Super admin login and rotation
fn super_admin_auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/auth/super-admin/login",
            post(handlers::auth::super_admin_login),
        )
        .route(
            "/auth/super-admin/refresh-token",
            post(handlers::auth::super_admin_refresh),
        )
}

/// Entity admin login and rotation, plus logout, me and validate for every principal
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh-token", post(handlers::auth::refresh))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
        .route("/auth/validate", post(handlers::auth::validate))
}

/// Subscriber login and rotation
fn subscriber_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/subscriber/auth/login", post(handlers::subscriber::login))
        .route(
            "/subscriber/auth/refresh-token",
            post(handlers::subscriber::refresh),
        )
}

/// Super admin only
fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/ping", get(handlers::admin::ping))
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
