//! This module provides the `SupervisorBuilder` for constructing a `Supervisor`.

use std::sync::Arc;

use super::{Supervisor, SupervisorError};
use crate::{
    classifier::Classifier,
    config::AppConfig,
    context::AppMetrics,
    engine::ContentPipeline,
    persistence::{AlertStore, InMemoryAlertStore, StateRepository},
    providers::{Chain, ChainGateway, ContentEventSource, ContractName, EvmContentSource},
    transactor::{Flagger, GuardianTransactor},
};

/// A builder for creating a `Supervisor` instance.
#[derive(Default)]
pub struct SupervisorBuilder {
    config: Option<AppConfig>,
    state: Option<Arc<dyn StateRepository>>,
    gateway: Option<Arc<ChainGateway>>,
    classifier: Option<Arc<dyn Classifier>>,
    alerts: Option<Arc<dyn AlertStore>>,
    flagger: Option<Arc<dyn Flagger>>,
    content_source: Option<Arc<dyn ContentEventSource>>,
    app_metrics: Option<AppMetrics>,
}

impl SupervisorBuilder {
    /// Creates a new, empty `SupervisorBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application configuration for the `Supervisor`.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the state repository (database connection) for the `Supervisor`.
    pub fn state(mut self, state: Arc<dyn StateRepository>) -> Self {
        self.state = Some(state);
        self
    }

    /// Sets the chain gateway.
    pub fn gateway(mut self, gateway: Arc<ChainGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Sets the classifier.
    pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Overrides the alert store. Defaults to an in-memory ledger.
    pub fn alert_store(mut self, alerts: Arc<dyn AlertStore>) -> Self {
        self.alerts = Some(alerts);
        self
    }

    /// Overrides the flagger. Defaults to a `GuardianTransactor` over the
    /// gateway.
    pub fn flagger(mut self, flagger: Arc<dyn Flagger>) -> Self {
        self.flagger = Some(flagger);
        self
    }

    /// Overrides the content event source. Defaults to the gateway's content
    /// contract, when bound.
    pub fn content_source(mut self, source: Arc<dyn ContentEventSource>) -> Self {
        self.content_source = Some(source);
        self
    }

    /// Sets shared metrics, for callers that need to observe them.
    pub fn app_metrics(mut self, app_metrics: AppMetrics) -> Self {
        self.app_metrics = Some(app_metrics);
        self
    }

    /// Assembles and validates the components to build a `Supervisor`.
    ///
    /// All required dependencies must have been provided; the pipeline and
    /// its defaults are wired here.
    pub fn build(self) -> Result<Supervisor, SupervisorError> {
        let config = self.config.ok_or(SupervisorError::MissingConfig)?;
        let state = self.state.ok_or(SupervisorError::MissingStateRepository)?;
        let gateway = self.gateway.ok_or(SupervisorError::MissingGateway)?;
        let classifier = self.classifier.ok_or(SupervisorError::MissingClassifier)?;

        let flagger: Arc<dyn Flagger> = match self.flagger {
            Some(flagger) => flagger,
            None => Arc::new(GuardianTransactor::new(Arc::clone(&gateway), &config.transactor)?),
        };
        let alerts = self.alerts.unwrap_or_else(|| Arc::new(InMemoryAlertStore::new()));
        let content_source = self.content_source.or_else(|| {
            gateway
                .contract(Chain::Source, ContractName::Content)
                .map(|handle| Arc::new(EvmContentSource::from_handle(handle)) as Arc<dyn ContentEventSource>)
        });
        let app_metrics = self.app_metrics.unwrap_or_default();

        let pipeline = Arc::new(ContentPipeline::new(classifier, flagger, alerts, app_metrics));

        Ok(Supervisor::new(config, state, gateway, pipeline, content_source))
    }
}
