//! Keyword-based classifier used when no language model is configured.

use async_trait::async_trait;

use super::Classifier;
use crate::models::ClassificationResult;

/// Phrases whose presence marks content as MALICIOUS.
pub const SUSPICIOUS_PHRASES: [&str; 15] = [
    "click here",
    "free prize",
    "urgent",
    "claim now",
    "limited time",
    "winner",
    "congratulations",
    "act fast",
    "exclusive offer",
    "scam",
    "phishing",
    "steal",
    "hack",
    "virus",
    "malware",
];

/// Deterministic, I/O-free classifier over [`SUSPICIOUS_PHRASES`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    /// Creates the classifier with the built-in phrase list.
    pub fn new() -> Self {
        Self
    }

    /// Returns the phrase that occurs earliest in `content` (case-insensitive),
    /// preferring the one listed first when two start at the same offset.
    pub fn first_match(content: &str) -> Option<&'static str> {
        let lowered = content.to_lowercase();
        SUSPICIOUS_PHRASES
            .iter()
            .enumerate()
            .filter_map(|(rank, phrase)| lowered.find(phrase).map(|at| (at, rank, *phrase)))
            .min()
            .map(|(_, _, phrase)| phrase)
    }

    /// Classifies `content`; the matched phrase becomes the reasoning.
    pub fn evaluate(content: &str) -> ClassificationResult {
        match Self::first_match(content) {
            Some(phrase) => ClassificationResult::malicious(phrase),
            None => ClassificationResult::safe("Content appears safe"),
        }
    }
}

#[async_trait]
impl Classifier for HeuristicClassifier {
    async fn classify(&self, content: &str) -> ClassificationResult {
        let result = Self::evaluate(content);
        tracing::debug!(label = %result.label, reasoning = %result.reasoning, "Heuristic classification complete.");
        result
    }

    fn strategy(&self) -> &'static str {
        "heuristic"
    }
}
