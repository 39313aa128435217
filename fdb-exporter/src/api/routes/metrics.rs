//! Prometheus scrape endpoint.

use axum::{extract::State, http::header, response::IntoResponse};

use crate::api::error::ApiResult;
use crate::api::server::AppState;
use crate::prometheus;

/// Run one collection cycle and render it in the text exposition format.
pub async fn scrape(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let samples = state.collector.collect().await?;
    Ok((
        [(header::CONTENT_TYPE, prometheus::CONTENT_TYPE)],
        prometheus::render(&samples),
    ))
}
