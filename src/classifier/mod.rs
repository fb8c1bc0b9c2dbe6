//! Content classification.
//!
//! A [`Classifier`] never fails: transport and model errors are converted
//! into a verdict chosen by the configured [`FailurePolicy`], and malformed
//! model output is converted into [`AMBIGUOUS_OUTPUT_LABEL`].
//!
//! [`FailurePolicy`]: crate::config::FailurePolicy

mod heuristic;
mod llm;

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
pub use heuristic::{HeuristicClassifier, SUSPICIOUS_PHRASES};
pub use llm::{LlmClassifier, interpret_model_output};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::{
    config::{AppConfig, ClassifierProvider},
    http_client::create_retryable_http_client,
    models::{ClassificationResult, Label},
};

/// Verdict used when the model answers with anything other than exactly
/// `SAFE` or `MALICIOUS`.
pub const AMBIGUOUS_OUTPUT_LABEL: Label = Label::Safe;

/// Failures while talking to the language model. These never escape
/// [`Classifier::classify`].
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The request could not be sent or its retries ran out.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    /// The API answered with a non-success status.
    #[error("model API returned HTTP {0}")]
    Status(u16),

    /// The response body is not a chat completion.
    #[error("could not decode model response: {0}")]
    Decode(reqwest::Error),

    /// The completion carried no choices.
    #[error("model response contained no choices")]
    EmptyResponse,

    /// The call exceeded the configured deadline.
    #[error("model did not answer within {0:?}")]
    Timeout(Duration),

    /// The HTTP client could not be constructed.
    #[error("could not build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
}

/// Turns content into a SAFE/MALICIOUS verdict.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies `content`. Infallible by contract.
    async fn classify(&self, content: &str) -> ClassificationResult;

    /// Short name of the strategy, for health reporting.
    fn strategy(&self) -> &'static str;
}

/// Builds the classifier selected in configuration.
///
/// Selecting `llm` without an API key falls back to the heuristic.
pub fn create_classifier(config: &AppConfig) -> Result<Arc<dyn Classifier>, ClassifierError> {
    let settings = &config.classifier;
    match (settings.provider, settings.api_key.as_ref()) {
        (ClassifierProvider::Heuristic, _) => {
            tracing::info!("Using heuristic classifier.");
            Ok(Arc::new(HeuristicClassifier::new()))
        }
        (ClassifierProvider::Llm, Some(key)) if !key.is_blank() => {
            let base_client = config
                .http_base_config
                .build_client(settings.request_timeout)
                .map_err(ClassifierError::ClientBuild)?;
            let client = create_retryable_http_client(&config.http_retry_config, base_client);
            tracing::info!(model = %settings.model_id, endpoint = %settings.endpoint, "Using language-model classifier.");
            Ok(Arc::new(LlmClassifier::new(Arc::new(client), settings, key.clone())))
        }
        (ClassifierProvider::Llm, _) => {
            tracing::warn!("No classifier API key configured; falling back to heuristic classifier.");
            Ok(Arc::new(HeuristicClassifier::new()))
        }
    }
}
