//! Represents the `/status` endpoint handler and response structure.
//! Provides application status and metrics.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;

use super::ApiState;

/// Represents the response from the `/status` endpoint.
#[derive(Debug, Serialize, Clone)]
pub struct StatusResponse {
    /// The version of the application.
    pub version: String,
    /// The uptime of the application in seconds.
    pub uptime_secs: u64,
    pub analyzed: u64,
    pub safe: u64,
    pub malicious: u64,
    pub flagged: u64,
    /// The latest source-chain block whose events have been processed.
    pub latest_processed_block: Option<u64>,
}

/// Retrieves application status and metrics.
pub async fn status(State(state): State<ApiState>) -> impl IntoResponse {
    let metrics = state.pipeline.metrics().snapshot().await;
    let response = StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: metrics.start_time.elapsed().as_secs(),
        analyzed: metrics.analyzed,
        safe: metrics.safe,
        malicious: metrics.malicious,
        flagged: metrics.flagged,
        latest_processed_block: metrics.latest_processed_block,
    };
    (StatusCode::OK, Json(response))
}
