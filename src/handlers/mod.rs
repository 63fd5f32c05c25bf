//! HTTP handlers module
//!
//! Contains all HTTP endpoint handling logic

pub mod health;
pub mod status;

use crate::config::{PlanTable, Settings};
use crate::middleware::logging::request_logging_middleware;
use crate::services::{CommandRunner, StatusService};
use anyhow::{Context, Result};
use axum::{http::HeaderValue, http::Method, middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub status: StatusService,
}

/// Create application router
///
/// `runner` executes the probe and usage commands; tests pass a scripted one.
pub async fn create_router(settings: Settings, runner: Arc<dyn CommandRunner>) -> Result<Router> {
    let plans = Arc::new(PlanTable::builtin());
    let status_service = StatusService::from_settings(&settings, plans, runner);

    let cors = if settings.security.cors_enabled {
        Some(build_cors_layer(&settings.security.allowed_origins)?)
    } else {
        None
    };

    // Create application state
    let app_state = Arc::new(AppState {
        status: status_service,
    });

    // Create middleware stack
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_logging_middleware));

    // Create routes
    let mut router = Router::new()
        .route("/status", get(status::get_status))
        .route("/health", get(health::health_check))
        .with_state(app_state)
        .layer(middleware_stack);

    if let Some(cors) = cors {
        router = router.layer(cors);
    }

    Ok(router)
}

/// Build the CORS layer for the configured origins
fn build_cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);

    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return Ok(layer.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer.allow_origin(AllowOrigin::list(origins)))
}
