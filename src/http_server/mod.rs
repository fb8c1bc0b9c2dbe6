//! HTTP server module
//!
//! A thin JSON surface over the content pipeline and the alert ledger.

mod alerts;
mod content;
mod error;
mod health;
mod status;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
pub use error::ApiError;
pub use health::HealthResponse;
pub use status::StatusResponse;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::{config::ServerConfig, engine::ContentPipeline, providers::ChainGateway};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct ApiState {
    /// Runs `/analyze-content` submissions and holds the alerts.
    pub pipeline: Arc<ContentPipeline>,
    /// Chain connectivity reported by `/`.
    pub gateway: Arc<ChainGateway>,
}

impl ApiState {
    /// Creates the handler state.
    pub fn new(pipeline: Arc<ContentPipeline>, gateway: Arc<ChainGateway>) -> Self {
        Self { pipeline, gateway }
    }
}

/// Builds the application router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(health::health))
        .route("/analyze-content", post(content::analyze_content))
        .route("/alerts", get(alerts::list_alerts))
        .route("/alerts/latest", get(alerts::latest_alert))
        .route("/status", get(status::status))
        .with_state(state)
}

/// Serves the API on an already-bound listener until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    state: ApiState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(address) = listener.local_addr() {
        tracing::info!(%address, "HTTP server listening.");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    tracing::info!("HTTP server has shut down.");
    Ok(())
}

/// Runs the HTTP server based on the provided server configuration.
pub async fn run_server_from_config(
    config: &ServerConfig,
    state: ApiState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let addr: SocketAddr = config.listen_address.parse().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid server.listen_address {:?}: {e}", config.listen_address),
        )
    })?;
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state, shutdown).await
}
