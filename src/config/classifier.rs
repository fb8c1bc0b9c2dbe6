use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::{SecretString, deserialize_duration_from_ms};
use crate::models::Label;

/// Which classification strategy the oracle runs.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierProvider {
    /// Remote chat-completion model. Falls back to the heuristic when no API
    /// key is configured.
    #[default]
    Llm,
    /// Local keyword scan.
    Heuristic,
}

/// The label returned when the language model cannot be reached.
///
/// `FailOpen` keeps the service available by treating unreachable-model
/// content as SAFE; `FailClosed` treats it as MALICIOUS.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Treat the content as SAFE.
    #[default]
    FailOpen,
    /// Treat the content as MALICIOUS.
    FailClosed,
}

impl FailurePolicy {
    /// The verdict substituted for a failed classification.
    pub fn fallback_label(self) -> Label {
        match self {
            FailurePolicy::FailOpen => Label::Safe,
            FailurePolicy::FailClosed => Label::Malicious,
        }
    }
}

fn default_endpoint() -> Url {
    Url::parse("https://api.groq.com/openai/v1").expect("static URL is valid")
}

fn default_model_id() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_max_output_tokens() -> u32 {
    10
}

fn default_temperature() -> f32 {
    0.1
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Classifier settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Classification strategy.
    #[serde(default)]
    pub provider: ClassifierProvider,

    /// Base URL of an OpenAI-compatible API (the `/chat/completions` path is
    /// appended).
    #[serde(default = "default_endpoint")]
    pub endpoint: Url,

    /// Model name sent with each request.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Upper bound on the tokens the model may generate.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Bearer token for the model API.
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Deadline for one classification call, retries included.
    #[serde(
        rename = "request_timeout_ms",
        default = "default_request_timeout",
        deserialize_with = "deserialize_duration_from_ms"
    )]
    pub request_timeout: Duration,

    /// Verdict used when the model cannot be reached.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: ClassifierProvider::default(),
            endpoint: default_endpoint(),
            model_id: default_model_id(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            api_key: None,
            request_timeout: default_request_timeout(),
            failure_policy: FailurePolicy::default(),
        }
    }
}
