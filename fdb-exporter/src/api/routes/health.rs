//! Health check routes.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};

use crate::api::server::AppState;

/// Create the health router.
pub fn router() -> Router<AppState> {
    Router::new().route("/live", get(liveness_check))
}

/// Liveness check - is the exporter process responsive?
///
/// Does not touch the database; a cluster outage shows up on `/metrics`.
async fn liveness_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "alive",
            "version": env!("CARGO_PKG_VERSION"),
            "uptime_secs": uptime
        })),
    )
}
