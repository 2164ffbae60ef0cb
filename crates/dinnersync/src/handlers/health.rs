//! Health check endpoint.

use axum::http::StatusCode;

/// GET /health - Basic liveness probe.
///
/// Returns 200 immediately. Used to check if the server is accepting
/// connections; no backing-store checks.
#[axum::debug_handler]
pub async fn health() -> StatusCode {
    StatusCode::OK
}
