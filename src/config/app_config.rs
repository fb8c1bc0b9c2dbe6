use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::{
    BaseHttpClientConfig, ChainsConfig, ClassifierConfig, HttpRetryConfig, IngestionConfig,
    RpcRetryConfig, ServerConfig, TransactorConfig, deserialize_duration_from_seconds,
};

/// Provides the default value for shutdown_timeout.
fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}

/// Provides the default location of the ingestion state database.
fn default_database_url() -> String {
    "sqlite:guardian_oracle.db".to_string()
}

/// Identifier under which the source chain's cursor is persisted.
fn default_source_network_id() -> String {
    "source".to_string()
}

/// Application configuration for the oracle.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// SQLite URL holding the ingestion cursor and processed-event keys.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Key of the source chain in the state repository.
    #[serde(default = "default_source_network_id")]
    pub source_network_id: String,

    /// Source and destination chain endpoints and contracts.
    #[serde(default)]
    pub chains: ChainsConfig,

    /// Retry and deadline policy for both chain providers.
    #[serde(default)]
    pub rpc_retry_config: RpcRetryConfig,

    /// Retry policy for the classifier's HTTP calls.
    #[serde(default)]
    pub http_retry_config: HttpRetryConfig,

    /// Connection-pool settings for the classifier's HTTP client.
    #[serde(default)]
    pub http_base_config: BaseHttpClientConfig,

    /// Which classifier to run and how to reach the model.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Flagging account and gas price.
    #[serde(default)]
    pub transactor: TransactorConfig,

    /// Source-chain event polling.
    #[serde(default)]
    pub ingestion: IngestionConfig,

    /// HTTP API.
    #[serde(default)]
    pub server: ServerConfig,

    /// The maximum time in seconds to wait for graceful shutdown.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_shutdown_timeout"
    )]
    pub shutdown_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            source_network_id: default_source_network_id(),
            chains: ChainsConfig::default(),
            rpc_retry_config: RpcRetryConfig::default(),
            http_retry_config: HttpRetryConfig::default(),
            http_base_config: BaseHttpClientConfig::default(),
            classifier: ClassifierConfig::default(),
            transactor: TransactorConfig::default(),
            ingestion: IngestionConfig::default(),
            server: ServerConfig::default(),
            shutdown_timeout: default_shutdown_timeout(),
        }
    }
}

impl AppConfig {
    /// Loads `app.yaml` from the configuration directory (if present) and
    /// overlays `GUARDIAN__*` environment variables, e.g.
    /// `GUARDIAN__CHAINS__DESTINATION__CONTRACT_ADDRESS`.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/app.yaml", config_dir_str)).required(false))
            .add_source(Environment::with_prefix("GUARDIAN").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;
    use crate::config::{ClassifierProvider, FailurePolicy};

    #[test]
    fn test_app_config_from_file() {
        let config_content = r#"
        database_url: "sqlite::memory:"
        chains:
          source:
            rpc_urls: ["http://127.0.0.1:8545"]
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3"
          destination:
            rpc_urls: ["http://127.0.0.1:8546"]
            contract_address: "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"
        classifier:
          provider: heuristic
        ingestion:
          polling_interval_ms: 1000
        "#;
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("app.yaml"), config_content).unwrap();

        let config = AppConfig::new(Some(temp_dir.path().to_str().unwrap())).unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(
            config.chains.destination.contract_address,
            Some(address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512"))
        );
        assert_eq!(config.classifier.provider, ClassifierProvider::Heuristic);
        assert_eq!(config.classifier.failure_policy, FailurePolicy::FailOpen);
        assert_eq!(config.ingestion.polling_interval, Duration::from_secs(1));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
        assert_eq!(config.transactor.gas_price_gwei, 25);
        assert_eq!(config.source_network_id, "source");
    }

    #[test]
    fn test_app_config_without_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = AppConfig::new(Some(temp_dir.path().to_str().unwrap())).unwrap();

        assert_eq!(config.chains.source.rpc_urls[0].as_str(), "http://127.0.0.1:8545/");
        assert!(config.chains.destination.contract_address.is_none());
        assert!(config.transactor.private_key.is_none());
        assert!(config.server.enabled);
    }

    #[test]
    fn test_shutdown_timeout_is_read_in_seconds() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("app.yaml"), "shutdown_timeout: 5\n").unwrap();

        let config = AppConfig::new(Some(temp_dir.path().to_str().unwrap())).unwrap();

        assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
    }
}
