use std::time::Duration;

use serde::Deserialize;

use super::{deserialize_duration_from_ms, serialize_duration_to_ms};

fn default_enabled() -> bool {
    true
}

fn default_polling_interval() -> Duration {
    Duration::from_secs(5)
}

fn default_block_chunk_size() -> u64 {
    100
}

fn default_initial_lookback_blocks() -> u64 {
    100
}

/// Settings for the loop that pulls `ContentSubmitted` events off the source
/// chain.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct IngestionConfig {
    /// Whether the ingestor runs at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Delay between polling cycles.
    #[serde(
        rename = "polling_interval_ms",
        default = "default_polling_interval",
        deserialize_with = "deserialize_duration_from_ms",
        serialize_with = "serialize_duration_to_ms"
    )]
    pub polling_interval: Duration,

    /// Blocks behind the head that are considered final enough to ingest.
    #[serde(default)]
    pub confirmation_blocks: u64,

    /// Maximum span of blocks requested per `eth_getLogs` call.
    #[serde(default = "default_block_chunk_size")]
    pub block_chunk_size: u64,

    /// How far behind the head to start when no cursor has been persisted.
    #[serde(default = "default_initial_lookback_blocks")]
    pub initial_lookback_blocks: u64,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            polling_interval: default_polling_interval(),
            confirmation_blocks: 0,
            block_chunk_size: default_block_chunk_size(),
            initial_lookback_blocks: default_initial_lookback_blocks(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingestion_defaults_poll_every_five_seconds() {
        let config: IngestionConfig = serde_json::from_str("{}").unwrap();
        assert!(config.enabled);
        assert_eq!(config.polling_interval, Duration::from_secs(5));
        assert_eq!(config.confirmation_blocks, 0);
        assert_eq!(config.block_chunk_size, 100);
    }

    #[test]
    fn test_ingestion_custom_values() {
        let config: IngestionConfig = serde_json::from_str(
            r#"{"polling_interval_ms": 750, "confirmation_blocks": 2, "block_chunk_size": 10}"#,
        )
        .unwrap();
        assert_eq!(config.polling_interval, Duration::from_millis(750));
        assert_eq!(config.confirmation_blocks, 2);
        assert_eq!(config.block_chunk_size, 10);
    }
}
