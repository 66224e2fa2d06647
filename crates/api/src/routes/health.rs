//! Health check endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// `s3`, `local`, or `misconfigured`.
    pub storage: &'static str,
}

/// Health check handler.
///
/// Misconfigured storage degrades the status but the service keeps serving
/// the tools that do not persist.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, storage) = match state.persistence() {
        Ok(service) => ("healthy", service.resolver().mode().as_str()),
        Err(_) => ("degraded", "misconfigured"),
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        storage,
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
