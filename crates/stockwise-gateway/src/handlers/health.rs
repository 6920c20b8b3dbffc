//! Health endpoint.

use super::AppState;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status.
    pub status: String,

    /// Server version.
    pub version: String,

    /// Uptime in seconds.
    pub uptime_seconds: u64,

    /// Documents in the index.
    pub documents: usize,
}

/// `GET /health`
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    debug!("Health check request");

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started.elapsed().as_secs(),
        documents: state.service.index().len().await,
    })
}
