//! This module defines the interface for reading content events from the
//! source chain.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::{models::ContentEvent, persistence::error::PersistenceError};

/// Custom error type for data source operations.
#[derive(Error, Debug)]
pub enum DataSourceError {
    /// Error when interacting with the provider.
    #[error("Provider error: {0}")]
    Provider(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// The node did not answer within the configured RPC timeout.
    #[error("RPC call timed out after {0:?}")]
    Timeout(Duration),

    /// An error occurred while interacting with the state repository.
    #[error("State repository error: {0}")]
    StateRepository(#[from] PersistenceError),
}

/// A source of `ContentSubmitted` events.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContentEventSource: Send + Sync {
    /// Fetches the current block number of the source chain.
    async fn current_block_number(&self) -> Result<u64, DataSourceError>;

    /// Fetches the decoded content events emitted in `from..=to`, ordered by
    /// `(block_number, log_index)`.
    async fn fetch_content_events(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ContentEvent>, DataSourceError>;
}
