//! Classification verdicts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The binary verdict produced for a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    /// Harmless content.
    Safe,
    /// Scam, phishing or otherwise harmful content.
    Malicious,
}

impl Label {
    /// Parses an exact verdict token (`SAFE` or `MALICIOUS`).
    ///
    /// Any other spelling, including surrounding text, yields `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "SAFE" => Some(Label::Safe),
            "MALICIOUS" => Some(Label::Malicious),
            _ => None,
        }
    }

    /// The upper-case token for this label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Safe => "SAFE",
            Label::Malicious => "MALICIOUS",
        }
    }

    /// Whether the content must be flagged.
    pub fn is_malicious(&self) -> bool {
        matches!(self, Label::Malicious)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verdict together with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// The verdict.
    pub label: Label,
    /// Why the verdict was reached.
    pub reasoning: String,
}

impl ClassificationResult {
    /// Creates a result with the given label.
    pub fn new(label: Label, reasoning: impl Into<String>) -> Self {
        Self { label, reasoning: reasoning.into() }
    }

    /// A SAFE result.
    pub fn safe(reasoning: impl Into<String>) -> Self {
        Self::new(Label::Safe, reasoning)
    }

    /// A MALICIOUS result.
    pub fn malicious(reasoning: impl Into<String>) -> Self {
        Self::new(Label::Malicious, reasoning)
    }
}
