//! API route modules.

pub mod health;
pub mod metrics;

use axum::{Router, routing::get};

use crate::api::server::AppState;

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/metrics", get(metrics::scrape))
        .nest("/health", health::router())
        .with_state(state)
}

async fn index() -> &'static str {
    "FoundationDB exporter\n\nMetrics are served at /metrics\n"
}
