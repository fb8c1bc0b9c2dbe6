//! Configuration for the oracle: a YAML file overlaid by `GUARDIAN__*`
//! environment variables.

mod app_config;
mod chains;
mod classifier;
mod helpers;
mod http_base;
mod http_retry;
mod ingestion;
mod rpc_retry;
mod server;
mod transactor;

pub use app_config::AppConfig;
pub use chains::{ChainEndpointConfig, ChainsConfig};
pub use classifier::{ClassifierConfig, ClassifierProvider, FailurePolicy};
pub use helpers::{
    SecretString, deserialize_duration_from_ms, deserialize_duration_from_seconds,
    deserialize_optional_address, deserialize_urls, serialize_duration_to_ms,
    serialize_duration_to_seconds,
};
pub use http_base::BaseHttpClientConfig;
pub use http_retry::{HttpRetryConfig, JitterSetting};
pub use ingestion::IngestionConfig;
pub use rpc_retry::RpcRetryConfig;
pub use server::ServerConfig;
pub use transactor::TransactorConfig;
