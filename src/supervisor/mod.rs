//! The Supervisor module manages the lifecycle of the oracle.
//!
//! The `SupervisorBuilder` wires the pipeline together; the `Supervisor`
//! then owns the long-running services (the HTTP API and the source-chain
//! event ingestor), listens for SIGINT/SIGTERM, and shuts everything down
//! through a shared cancellation token. If a supervised task panics, every
//! other task is cancelled so the process exits cleanly rather than running
//! half-alive.

mod builder;

use std::sync::Arc;

pub use builder::SupervisorBuilder;
use thiserror::Error;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    config::AppConfig,
    engine::{ContentPipeline, EventIngestor},
    http_server::{self, ApiState},
    persistence::StateRepository,
    providers::{ChainGateway, ContentEventSource},
    transactor::TransactorError,
};

/// Represents the set of errors that can occur during the supervisor's
/// operation.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A required configuration was not provided to the `SupervisorBuilder`.
    #[error("Missing configuration for Supervisor")]
    MissingConfig,

    /// A state repository was not provided to the `SupervisorBuilder`.
    #[error("Missing state repository for Supervisor")]
    MissingStateRepository,

    /// A chain gateway was not provided to the `SupervisorBuilder`.
    #[error("Missing chain gateway for Supervisor")]
    MissingGateway,

    /// A classifier was not provided to the `SupervisorBuilder`.
    #[error("Missing classifier for Supervisor")]
    MissingClassifier,

    /// The default transactor could not be created.
    #[error("Transactor error: {0}")]
    Transactor(#[from] TransactorError),
}

/// The primary runtime manager for the application.
pub struct Supervisor {
    /// Shared application configuration.
    config: Arc<AppConfig>,

    /// The persistent state repository for the ingestion cursor.
    state: Arc<dyn StateRepository>,

    gateway: Arc<ChainGateway>,

    pipeline: Arc<ContentPipeline>,

    /// `None` when the content contract is unavailable.
    content_source: Option<Arc<dyn ContentEventSource>>,

    /// A token used to signal a graceful shutdown to all supervised tasks.
    cancellation_token: CancellationToken,

    /// A set of all spawned tasks that the supervisor is actively managing.
    join_set: tokio::task::JoinSet<()>,
}

impl Supervisor {
    /// Creates a new Supervisor instance with all its required components.
    ///
    /// This is typically called by the `SupervisorBuilder`.
    pub fn new(
        config: AppConfig,
        state: Arc<dyn StateRepository>,
        gateway: Arc<ChainGateway>,
        pipeline: Arc<ContentPipeline>,
        content_source: Option<Arc<dyn ContentEventSource>>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            state,
            gateway,
            pipeline,
            content_source,
            cancellation_token: CancellationToken::new(),
            join_set: tokio::task::JoinSet::new(),
        }
    }

    /// Returns a new `SupervisorBuilder` instance.
    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }

    /// The pipeline shared by the API and the ingestor.
    pub fn pipeline(&self) -> &Arc<ContentPipeline> {
        &self.pipeline
    }

    /// A handle that stops the supervisor when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Starts the supervisor and all its managed services, and returns once
    /// they have stopped and state has been flushed.
    pub async fn run(mut self) -> Result<(), SupervisorError> {
        let cancellation_token = self.cancellation_token.clone();
        self.join_set.spawn(async move {
            let ctrl_c = signal::ctrl_c();
            #[cfg(unix)]
            let terminate = async {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut stream) => {
                        stream.recv().await;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to register SIGTERM handler.");
                        std::future::pending::<()>().await;
                    }
                }
            };
            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::info!("SIGINT (Ctrl+C) received, initiating graceful shutdown."),
                _ = terminate => tracing::info!("SIGTERM received, initiating graceful shutdown."),
                _ = cancellation_token.cancelled() => return,
            }

            cancellation_token.cancel();
        });

        if self.config.server.enabled {
            let server_config = self.config.server.clone();
            let api_state = ApiState::new(Arc::clone(&self.pipeline), Arc::clone(&self.gateway));
            let http_cancellation_token = self.cancellation_token.clone();
            self.join_set.spawn(async move {
                if let Err(e) = http_server::run_server_from_config(
                    &server_config,
                    api_state,
                    http_cancellation_token.clone(),
                )
                .await
                {
                    tracing::error!(error = %e, "HTTP server failed. Initiating shutdown.");
                    http_cancellation_token.cancel();
                }
            });
        }

        if self.config.ingestion.enabled {
            let event_ingestor: EventIngestor<dyn StateRepository, dyn ContentEventSource> =
                EventIngestor::new(
                    self.config.source_network_id.clone(),
                    self.config.ingestion.clone(),
                    Arc::clone(&self.state),
                    self.content_source.clone(),
                    Arc::clone(&self.pipeline),
                    self.cancellation_token.clone(),
                );
            self.join_set.spawn(async move {
                event_ingestor.run().await;
            });
        }

        loop {
            tokio::select! {
                maybe_result = self.join_set.join_next() => {
                    match maybe_result {
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::error!(error = ?e, "A critical task failed. Initiating shutdown.");
                            self.cancellation_token.cancel();
                        }
                        None => break,
                    }
                }
                _ = self.cancellation_token.cancelled() => break,
            }
        }

        // Let tasks observe the cancellation before aborting stragglers.
        let drain = async { while self.join_set.join_next().await.is_some() {} };
        if tokio::time::timeout(self.config.shutdown_timeout, drain).await.is_err() {
            tracing::warn!("Supervised tasks did not stop in time; aborting them.");
        }
        self.join_set.shutdown().await;
        tracing::info!("All supervised tasks have completed.");

        tracing::info!("Starting graceful resource cleanup...");
        let shutdown_timeout = self.config.shutdown_timeout;
        let network_id = self.config.source_network_id.clone();
        let state = Arc::clone(&self.state);

        let cleanup_logic = async move {
            if let Err(e) = state.flush().await {
                tracing::error!(error = %e, "Failed to flush pending writes, but continuing cleanup.");
            }
            if let Err(e) = state.cleanup().await {
                tracing::error!(error = %e, "Failed to perform state repository cleanup, but continuing.");
            }
            match state.get_last_processed_block(&network_id).await {
                Ok(Some(last_block)) => tracing::info!(
                    last_processed_block = last_block,
                    "Final state: last processed block recorded."
                ),
                Ok(None) => tracing::info!("Final state: no blocks have been processed yet."),
                Err(e) => {
                    tracing::warn!(error = %e, "Could not retrieve final state during cleanup.")
                }
            }
        };

        if tokio::time::timeout(shutdown_timeout, cleanup_logic).await.is_err() {
            tracing::warn!(
                timeout = ?shutdown_timeout,
                "Cleanup did not complete within the timeout. Continuing shutdown."
            );
        } else {
            tracing::info!("Cleanup completed successfully.");
        }

        tracing::info!("Supervisor shutdown complete.");
        Ok(())
    }
}
