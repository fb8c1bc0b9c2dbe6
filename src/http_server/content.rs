//! Handler for the content analysis endpoint.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};

use super::{ApiError, ApiState};
use crate::models::ContentSubmission;

/// Runs a submission through the pipeline and returns the analysis.
pub async fn analyze_content(
    State(state): State<ApiState>,
    Json(submission): Json<ContentSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.pipeline.process(&submission).await?;
    Ok((StatusCode::OK, Json(response)))
}
