//! Represents the `/` health endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;

use super::ApiState;
use crate::providers::Chain;

/// Represents the response from the health endpoint.
#[derive(Debug, Serialize, Clone)]
pub struct HealthResponse {
    /// Always `ok` when the server answers.
    pub status: &'static str,
    /// Strategy of the active classifier (`llm` or `heuristic`).
    pub classifier: &'static str,
    /// Whether the source chain answered at startup.
    pub source_connected: bool,
    /// Whether the destination chain answered at startup.
    pub destination_connected: bool,
}

/// Reports liveness and the state of both chain connections.
pub async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "running",
        classifier: state.pipeline.classifier().strategy(),
        source_connected: state.gateway.is_connected(Chain::Source),
        destination_connected: state.gateway.is_connected(Chain::Destination),
    };
    (StatusCode::OK, Json(response))
}
