//! Handlers for the alert ledger.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use super::ApiState;

/// Returns every recorded alert in insertion order.
pub async fn list_alerts(State(state): State<ApiState>) -> impl IntoResponse {
    let alerts = state.pipeline.alerts().list();
    (StatusCode::OK, Json(json!({ "alerts": alerts })))
}

/// Returns the most recent alert, or `null` when none exists.
pub async fn latest_alert(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.pipeline.alerts().latest()))
}
