//! Construction of JSON-RPC providers with retry and fallback layers.

use std::{num::NonZeroUsize, sync::Arc};

use alloy::{
    providers::{Provider, ProviderBuilder},
    rpc::client::RpcClient,
    transports::{
        http::{Http, reqwest::Url},
        layers::{FallbackLayer, RetryBackoffLayer},
    },
};
use tower::ServiceBuilder;

use crate::config::RpcRetryConfig;

/// A provider shared between the gateway, the transactor and the event
/// source.
pub type SharedProvider = Arc<dyn Provider + Send + Sync>;

/// Custom error type for provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Error when creating the provider.
    #[error("Provider creation failed: {0}")]
    CreationError(String),
}

/// Creates a provider over the given RPC URLs. Requests are retried with
/// backoff and spread across all URLs by the fallback layer.
pub fn create_provider(
    urls: Vec<Url>,
    retry_config: &RpcRetryConfig,
) -> Result<SharedProvider, ProviderError> {
    let active_transports = NonZeroUsize::new(urls.len())
        .ok_or_else(|| ProviderError::CreationError("RPC URL list cannot be empty".into()))?;

    let fallback_layer = FallbackLayer::default().with_active_transport_count(active_transports);
    let transports: Vec<_> = urls.into_iter().map(Http::new).collect();

    let retry_layer = RetryBackoffLayer::new(
        retry_config.max_retry,
        retry_config.backoff_ms,
        retry_config.compute_units_per_second,
    );

    let service =
        ServiceBuilder::new().layer(retry_layer).layer(fallback_layer).service(transports);

    let client = RpcClient::builder().transport(service, false);
    Ok(Arc::new(ProviderBuilder::new().connect_client(client)))
}
