use std::time::Duration;

use serde::Deserialize;

use super::deserialize_duration_from_ms;

/// Configuration for the JSON-RPC retry backoff policy and call deadline,
/// shared by the source and destination chain providers.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RpcRetryConfig {
    /// The maximum number of retries for a request.
    pub max_retry: u32,
    /// The initial backoff delay in milliseconds.
    pub backoff_ms: u64, // u64 because RetryBackoffLayer takes it raw.
    /// The number of compute units per second to allow.
    pub compute_units_per_second: u64,
    /// Upper bound for a single logical RPC call, retries included.
    #[serde(rename = "request_timeout_ms", deserialize_with = "deserialize_duration_from_ms")]
    pub request_timeout: Duration,
}

impl Default for RpcRetryConfig {
    fn default() -> Self {
        Self {
            max_retry: 3,
            backoff_ms: 500,
            compute_units_per_second: 100,
            request_timeout: Duration::from_secs(10),
        }
    }
}
