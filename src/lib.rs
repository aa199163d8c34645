use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, Router};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod security;
pub mod services;
pub mod state;
pub mod webhook;

use observability::{metrics_middleware, monitoring_router};
use security::{get_cors_layer, security_headers_middleware};
use state::AppState;
use webhook::create_webhook_router;

/// LINE caps webhook bodies well below this.
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn create_app_router(app_state: Arc<AppState>) -> Router {
    let cors = get_cors_layer(&app_state.frontend_url);

    Router::new()
        // LINE webhook + rich menu administration
        .merge(create_webhook_router())
        // Health and Prometheus metrics
        .merge(monitoring_router())
        .with_state(app_state)
        .layer(axum_middleware::from_fn(metrics_middleware))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // A panicking handler becomes a 500 instead of a dropped connection
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(security_headers_middleware))
}
