//! Health check handler
//!
//! Reports liveness without touching the external commands

use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Service name reported by the health check
pub const SERVICE_NAME: &str = "ccusage_api";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
}

/// Basic health check
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Executing health check");

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
    })
}
