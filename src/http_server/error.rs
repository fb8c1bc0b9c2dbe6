//! Defines the custom `ApiError` type for the HTTP server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::engine::PipelineError;

/// A custom error type for the API that can be converted into an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    /// The pipeline could not produce a verdict.
    AnalysisFailed(String),
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::AnalysisFailed(err.to_string())
    }
}

/// Implements the conversion from `ApiError` into an `axum` response.
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::AnalysisFailed(err) => {
                tracing::error!(error = %err, "Content analysis failed.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": format!("Analysis failed: {err}") }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
