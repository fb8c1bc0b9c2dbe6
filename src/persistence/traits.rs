//! Storage interfaces: the alert ledger and the ingestion state.

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::error::PersistenceError;
use crate::models::{Alert, EventKey};

/// The append-only ledger of MALICIOUS verdicts.
///
/// Appends are atomic and reads return a consistent snapshot. There is no
/// bound and no de-duplication.
#[cfg_attr(test, automock)]
pub trait AlertStore: Send + Sync {
    /// Appends `alert` at the end of the ledger.
    fn append(&self, alert: Alert);

    /// Returns every alert in insertion order. The snapshot shares the
    /// stored alerts.
    fn list(&self) -> Vec<Arc<Alert>>;

    /// Returns the most recently appended alert, if any.
    fn latest(&self) -> Option<Arc<Alert>>;

    /// Number of alerts recorded so far.
    fn len(&self) -> usize {
        self.list().len()
    }

    /// Whether no alert has been recorded yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Persistent state of the source-chain event ingestor.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Retrieves the last processed block number for a given network.
    async fn get_last_processed_block(
        &self,
        network_id: &str,
    ) -> Result<Option<u64>, PersistenceError>;

    /// Sets the last processed block number for a given network. Processed
    /// event keys at or below it are discarded.
    async fn set_last_processed_block(
        &self,
        network_id: &str,
        block_number: u64,
    ) -> Result<(), PersistenceError>;

    /// Whether the event identified by `key` was already run through the
    /// pipeline.
    async fn is_event_processed(
        &self,
        network_id: &str,
        key: &EventKey,
    ) -> Result<bool, PersistenceError>;

    /// Records the event identified by `key`, emitted in `block_number`, as
    /// processed. Recording the same key twice is a no-op.
    async fn mark_event_processed(
        &self,
        network_id: &str,
        key: &EventKey,
        block_number: u64,
    ) -> Result<(), PersistenceError>;

    /// Performs any necessary cleanup operations before shutdown.
    async fn cleanup(&self) -> Result<(), PersistenceError>;

    /// Ensures all pending writes are flushed to disk.
    async fn flush(&self) -> Result<(), PersistenceError>;
}
