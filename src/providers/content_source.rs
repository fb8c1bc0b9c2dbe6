//! `ContentEventSource` backed by the content contract on the source chain.

use std::{future::IntoFuture, time::Duration};

use alloy::{primitives::Address, rpc::types::Filter, sol_types::SolEvent};
use async_trait::async_trait;

use super::{
    gateway::ContractHandle,
    rpc::SharedProvider,
    traits::{ContentEventSource, DataSourceError},
};
use crate::{contracts::IContentRegistry::ContentSubmitted, models::ContentEvent};

/// Reads `ContentSubmitted` logs through `eth_getLogs`.
pub struct EvmContentSource {
    provider: SharedProvider,
    contract: Address,
    call_timeout: Duration,
}

impl EvmContentSource {
    /// Creates a source for `contract` using `provider`.
    pub fn new(provider: SharedProvider, contract: Address, call_timeout: Duration) -> Self {
        Self { provider, contract, call_timeout }
    }

    /// Creates a source from a bound content contract handle.
    pub fn from_handle(handle: &ContractHandle) -> Self {
        Self::new(handle.provider().clone(), handle.address(), handle.connection().call_timeout())
    }

    async fn bounded<T, E, F>(&self, call: F) -> Result<T, DataSourceError>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result.map_err(|e| DataSourceError::Provider(Box::new(e))),
            Err(_) => Err(DataSourceError::Timeout(self.call_timeout)),
        }
    }
}

#[async_trait]
impl ContentEventSource for EvmContentSource {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn current_block_number(&self) -> Result<u64, DataSourceError> {
        self.bounded(self.provider.get_block_number()).await
    }

    #[tracing::instrument(skip(self), level = "debug")]
    async fn fetch_content_events(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ContentEvent>, DataSourceError> {
        let filter = Filter::new()
            .address(self.contract)
            .event_signature(ContentSubmitted::SIGNATURE_HASH)
            .from_block(from_block)
            .to_block(to_block);

        let logs = self.bounded(self.provider.get_logs(&filter)).await?;
        tracing::debug!(from_block, to_block, log_count = logs.len(), "Fetched content logs.");

        let mut events: Vec<ContentEvent> = logs
            .iter()
            .filter_map(|log| match ContentEvent::try_from(log) {
                Ok(event) => Some(event),
                Err(error) => {
                    tracing::warn!(
                        %error,
                        tx_hash = ?log.transaction_hash,
                        log_index = ?log.log_index,
                        "Skipping undecodable content log."
                    );
                    None
                }
            })
            .collect();
        events.sort_by_key(|event| (event.block_number, event.key.log_index));
        Ok(events)
    }
}
