//! Application context and initialization logic.
//! This module loads configuration, opens the state database, connects to
//! both chains and selects the classifier. The `AppContext` struct
//! encapsulates these components for the supervisor and the CLI.

mod error;
mod metrics;

use std::sync::Arc;

pub use error::AppContextError;
pub use metrics::{AppMetrics, Metrics};

use crate::{
    classifier::{Classifier, create_classifier},
    config::AppConfig,
    persistence::SqliteStateRepository,
    providers::{Chain, ChainGateway},
};

/// The application context, holding configuration, the state repository,
/// the chain gateway and the classifier.
pub struct AppContext {
    /// Shared application configuration.
    pub config: AppConfig,

    /// The state repository for the ingestion cursor.
    pub repo: Arc<SqliteStateRepository>,

    /// Connections and contract handles for both chains.
    pub gateway: Arc<ChainGateway>,

    /// The configured classifier.
    pub classifier: Arc<dyn Classifier>,
}

/// A builder for the `AppContext`, allowing configuration overrides
/// and step-by-step initialization.
#[derive(Debug, Default)]
pub struct AppContextBuilder {
    /// Optional configuration directory to load settings from.
    config_dir: Option<String>,

    /// Optional override for the database URL.
    database_url_override: Option<String>,
}

impl AppContextBuilder {
    /// Creates a new `AppContextBuilder` with an optional configuration
    /// directory.
    pub fn new(config_dir: Option<String>) -> Self {
        Self { config_dir, database_url_override: None }
    }

    /// Sets a database URL override.
    pub fn database_url(mut self, url: String) -> Self {
        self.database_url_override = Some(url);
        self
    }

    /// Loads the configuration, applying any overrides.
    pub fn load_config(&self) -> Result<AppConfig, AppContextError> {
        tracing::debug!("Loading application configuration...");
        let mut config = AppConfig::new(self.config_dir.as_deref())?;

        if let Some(db_url) = &self.database_url_override {
            tracing::info!(database_url = %db_url, "Overriding database URL.");
            config.database_url = db_url.clone();
        }
        tracing::debug!(
            database_url = %config.database_url,
            source_network_id = %config.source_network_id,
            "Configuration loaded."
        );
        Ok(config)
    }

    /// Builds the `AppContext`, performing all initialization steps.
    pub async fn build(self) -> Result<AppContext, AppContextError> {
        let config = self.load_config()?;

        tracing::debug!("Initializing state repository...");
        let repo = Arc::new(SqliteStateRepository::new(&config.database_url).await?);
        repo.run_migrations().await?;

        tracing::debug!("Connecting to source and destination chains...");
        let gateway = Arc::new(ChainGateway::connect(&config.chains, &config.rpc_retry_config).await);
        tracing::info!(
            source_connected = gateway.is_connected(Chain::Source),
            destination_connected = gateway.is_connected(Chain::Destination),
            "Chain gateway initialized."
        );

        let classifier = create_classifier(&config)?;
        tracing::info!(strategy = classifier.strategy(), "Classifier initialized.");

        Ok(AppContext { config, repo, gateway, classifier })
    }
}
