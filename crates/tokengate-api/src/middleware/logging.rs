//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

use tokengate_core::types::CanonicalPrincipal;

/// Logs request method, path, status, duration and, when the gate ran
/// first, the principal.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let principal = request
        .extensions()
        .get::<CanonicalPrincipal>()
        .map(|p| format!("{}:{}", p.principal_type, p.username));
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        path = %uri.path(),
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        principal = principal.as_deref().unwrap_or("-"),
        "HTTP request"
    );

    response
}
