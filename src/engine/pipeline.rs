//! The content pipeline: classify, flag if malicious, record, respond.

use std::{
    panic::AssertUnwindSafe,
    str::FromStr,
    sync::Arc,
    time::{SystemTime, SystemTimeError, UNIX_EPOCH},
};

use alloy::primitives::{Address, TxHash};
use futures::FutureExt;
use thiserror::Error;

use crate::{
    classifier::Classifier,
    context::AppMetrics,
    models::{Alert, AnalysisResponse, ContentSubmission, Label, SENTINEL_TX_HASH},
    persistence::AlertStore,
    transactor::Flagger,
};

/// Failures that abort a submission. Classification and flagging problems
/// are never reported here; they degrade into the response instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The timestamp for the alert could not be taken.
    #[error("system clock is before the unix epoch: {0}")]
    Clock(#[from] SystemTimeError),

    /// The classifier panicked while handling the submission.
    #[error("classifier panicked: {0}")]
    ClassifierPanicked(String),
}

/// Runs submissions through classification, flagging and the alert ledger.
///
/// Submissions are processed concurrently; the only shared mutable state is
/// the alert store and the transactor's nonce counter, each with its own
/// synchronisation.
pub struct ContentPipeline {
    classifier: Arc<dyn Classifier>,
    flagger: Arc<dyn Flagger>,
    alerts: Arc<dyn AlertStore>,
    metrics: AppMetrics,
}

impl ContentPipeline {
    /// Creates a pipeline over the given components.
    pub fn new(
        classifier: Arc<dyn Classifier>,
        flagger: Arc<dyn Flagger>,
        alerts: Arc<dyn AlertStore>,
        metrics: AppMetrics,
    ) -> Self {
        Self { classifier, flagger, alerts, metrics }
    }

    /// The active classifier.
    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    /// The alert ledger.
    pub fn alerts(&self) -> &Arc<dyn AlertStore> {
        &self.alerts
    }

    /// Counters updated by every submission.
    pub fn metrics(&self) -> &AppMetrics {
        &self.metrics
    }

    /// Processes one submission and builds the caller-facing response.
    #[tracing::instrument(skip_all, level = "info", fields(author = %submission.author_address))]
    pub async fn process(
        &self,
        submission: &ContentSubmission,
    ) -> Result<AnalysisResponse, PipelineError> {
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        let verdict = AssertUnwindSafe(async { self.classifier.classify(&submission.content).await })
            .catch_unwind()
            .await
            .map_err(|panic| PipelineError::ClassifierPanicked(panic_message(panic.as_ref())))?;
        self.metrics.record_verdict(verdict.label).await;
        tracing::info!(label = %verdict.label, reasoning = %verdict.reasoning, "Submission classified.");

        let mut response = AnalysisResponse {
            content: submission.content.clone(),
            author_address: submission.author_address.clone(),
            classification: verdict.label,
            reasoning: verdict.reasoning,
            timestamp,
            tx_hash: None,
            cross_chain_action: None,
        };

        if verdict.label == Label::Safe {
            return Ok(response);
        }

        let (tx_hash, action) = self.flag_author(&submission.author_address).await;
        self.alerts.append(Alert {
            timestamp,
            content: submission.content.clone(),
            author_address: submission.author_address.clone(),
            classification: Label::Malicious,
            tx_hash,
        });
        tracing::info!(%tx_hash, action = %action, "Alert recorded.");

        response.tx_hash = Some(tx_hash);
        response.cross_chain_action = Some(action);
        Ok(response)
    }

    async fn flag_author(&self, author: &str) -> (TxHash, String) {
        let target = match Address::from_str(author.trim()) {
            Ok(target) => target,
            Err(error) => {
                tracing::warn!(author, %error, "Author address is not a valid chain address.");
                return (SENTINEL_TX_HASH, format!("Failed: invalid author address {author:?}: {error}"));
            }
        };

        match self.flagger.flag(target).await {
            Ok(outcome) => {
                if outcome.is_submitted() {
                    self.metrics.record_flagged().await;
                }
                (outcome.tx_hash(), outcome.describe())
            }
            Err(error) => {
                tracing::error!(%error, "Flagging is misconfigured.");
                (SENTINEL_TX_HASH, format!("Failed: {error}"))
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
