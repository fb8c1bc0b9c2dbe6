//! The EventIngestor continuously reads `ContentSubmitted` events from the
//! source chain and runs each unique event once through the content
//! pipeline.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::pipeline::ContentPipeline;
use crate::{
    config::IngestionConfig,
    persistence::{PersistenceError, StateRepository},
    providers::{ContentEventSource, DataSourceError},
};

/// Errors that end an ingestion cycle early. The cycle is retried on the
/// next tick.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// The source chain could not be read.
    #[error("Data source error: {0}")]
    DataSource(#[from] DataSourceError),

    /// The cursor or event keys could not be read or written.
    #[error("State repository error: {0}")]
    State(#[from] PersistenceError),

}

/// The EventIngestor service.
///
/// Each cycle reads the persisted cursor, fetches confirmed logs in one
/// bounded chunk, skips events already recorded as processed, and only then
/// advances the cursor. A crash mid-chunk re-reads the chunk; the
/// per-event keys keep re-processing from producing duplicate alerts.
pub struct EventIngestor<S: StateRepository + ?Sized, D: ContentEventSource + ?Sized> {
    /// Key under which the cursor and event keys are stored.
    network_id: String,
    config: IngestionConfig,
    state: Arc<S>,
    /// `None` when the content contract is not bound; cycles are then skipped.
    source: Option<Arc<D>>,
    pipeline: Arc<ContentPipeline>,
    cancellation_token: CancellationToken,
}

impl<S: StateRepository + ?Sized, D: ContentEventSource + ?Sized> EventIngestor<S, D> {
    /// Creates a new EventIngestor instance.
    pub fn new(
        network_id: impl Into<String>,
        config: IngestionConfig,
        state: Arc<S>,
        source: Option<Arc<D>>,
        pipeline: Arc<ContentPipeline>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self { network_id: network_id.into(), config, state, source, pipeline, cancellation_token }
    }

    /// Starts the long-running service loop.
    pub async fn run(self) {
        tracing::info!(
            network_id = %self.network_id,
            polling_interval = ?self.config.polling_interval,
            "EventIngestor started."
        );
        loop {
            let polling_delay = tokio::time::sleep(self.config.polling_interval);

            tokio::select! {
                biased;

                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("EventIngestor cancellation signal received, shutting down...");
                    break;
                }

                _ = polling_delay => {
                    if let Err(e) = self.ingest_events().await {
                        tracing::error!(error = %e, "Error during ingestion cycle. Retrying after delay...");
                    }
                }
            }
        }
        tracing::info!("EventIngestor has shut down.");
    }

    /// Performs one ingestion cycle.
    async fn ingest_events(&self) -> Result<(), IngestionError> {
        let Some(source) = self.source.as_ref() else {
            tracing::debug!("Content contract unavailable. Skipping ingestion cycle.");
            return Ok(());
        };

        let network_id = self.network_id.as_str();
        let last_processed_block = self.state.get_last_processed_block(network_id).await?;
        let current_block = source.current_block_number().await?;

        if current_block < self.config.confirmation_blocks {
            tracing::debug!("Chain is shorter than the confirmation buffer. Waiting for more blocks.");
            return Ok(());
        }
        let safe_to_block = current_block - self.config.confirmation_blocks;

        let from_block = last_processed_block.map_or_else(
            || safe_to_block.saturating_sub(self.config.initial_lookback_blocks),
            |block| block + 1,
        );
        if from_block > safe_to_block {
            tracing::debug!("Caught up to confirmation buffer. Waiting for more blocks.");
            return Ok(());
        }

        let chunk_end = from_block.saturating_add(self.config.block_chunk_size.max(1) - 1);
        let to_block = std::cmp::min(chunk_end, safe_to_block);
        tracing::info!(from_block, to_block, "Processing block range.");

        let events = source.fetch_content_events(from_block, to_block).await?;
        for event in events {
            if self.cancellation_token.is_cancelled() {
                tracing::info!("Cancellation requested, leaving cursor before this range.");
                return Ok(());
            }

            if self.state.is_event_processed(network_id, &event.key).await? {
                tracing::debug!(event = %event.key, "Event already processed. Skipping.");
                continue;
            }

            match self.pipeline.process(&event.to_submission()).await {
                Ok(response) => tracing::info!(
                    event = %event.key,
                    block_number = event.block_number,
                    classification = %response.classification,
                    "Content event processed."
                ),
                // Terminal: the event is not retried on later cycles.
                Err(error) => tracing::error!(
                    event = %event.key,
                    block_number = event.block_number,
                    %error,
                    "Content event could not be processed. Skipping."
                ),
            }
            self.state.mark_event_processed(network_id, &event.key, event.block_number).await?;
        }

        self.state.set_last_processed_block(network_id, to_block).await?;
        self.pipeline.metrics().record_processed_block(to_block).await;
        Ok(())
    }
}
