//! Inbound content submissions and the analysis result returned for them.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};

use super::Label;

/// Content to be moderated, together with the address that authored it.
///
/// `author_address` is kept as provided; it is only parsed when a flagging
/// transaction needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSubmission {
    /// The text to classify.
    pub content: String,
    /// Address of the author, flagged if the content is MALICIOUS.
    pub author_address: String,
}

impl ContentSubmission {
    /// Creates a submission.
    pub fn new(content: impl Into<String>, author_address: impl Into<String>) -> Self {
        Self { content: content.into(), author_address: author_address.into() }
    }
}

/// The caller-facing result of running one submission through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// The submitted text.
    pub content: String,
    /// The submitted author address.
    pub author_address: String,
    /// The verdict.
    pub classification: Label,
    /// Why the verdict was reached.
    pub reasoning: String,
    /// When the submission was processed, in unix seconds.
    pub timestamp: u64,
    /// Present only for MALICIOUS verdicts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<TxHash>,
    /// Human-readable outcome of the flagging step, MALICIOUS only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_chain_action: Option<String>,
}
