use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{deserialize_duration_from_ms, serialize_duration_to_ms};

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff() -> Duration {
    Duration::from_millis(250)
}

fn default_max_backoff() -> Duration {
    Duration::from_millis(2_000)
}

fn default_base_for_backoff() -> u32 {
    2
}

/// Jitter applied between retries of an outbound HTTP request.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JitterSetting {
    /// Fixed exponential delays.
    None,
    /// Delays randomized over the full backoff window.
    #[default]
    Full,
}

/// Retry policy for outbound HTTP calls made by the classifier.
///
/// Retries only cover transient failures (connect errors, 5xx, 429); the
/// classifier's own request timeout still bounds the whole exchange.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct HttpRetryConfig {
    /// Maximum number of retries for transient errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base for the exponential backoff
    #[serde(default = "default_base_for_backoff")]
    pub base_for_backoff: u32,
    /// Delay before the first retry
    #[serde(
        rename = "initial_backoff_ms",
        default = "default_initial_backoff",
        deserialize_with = "deserialize_duration_from_ms",
        serialize_with = "serialize_duration_to_ms"
    )]
    pub initial_backoff: Duration,
    /// Ceiling for any single retry delay
    #[serde(
        rename = "max_backoff_ms",
        default = "default_max_backoff",
        deserialize_with = "deserialize_duration_from_ms",
        serialize_with = "serialize_duration_to_ms"
    )]
    pub max_backoff: Duration,
    /// Jitter applied to each backoff delay
    #[serde(default)]
    pub jitter: JitterSetting,
}

impl Default for HttpRetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_for_backoff: default_base_for_backoff(),
            initial_backoff: default_initial_backoff(),
            max_backoff: default_max_backoff(),
            jitter: JitterSetting::default(),
        }
    }
}
