use std::{net::SocketAddr, sync::Arc};

use guardian_oracle::{
    classifier::HeuristicClassifier,
    config::TransactorConfig,
    context::AppMetrics,
    engine::ContentPipeline,
    http_server::{self, ApiState},
    persistence::InMemoryAlertStore,
    providers::ChainGateway,
    transactor::GuardianTransactor,
};
use reqwest::Client;
use tokio::task;
use tokio_util::sync::CancellationToken;

pub const AUTHOR: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

/// A pipeline with the heuristic classifier and no reachable chains, so
/// malicious verdicts are recorded with the sentinel hash.
pub fn create_offline_pipeline() -> (Arc<ContentPipeline>, Arc<ChainGateway>) {
    let gateway = Arc::new(ChainGateway::offline());
    let transactor = GuardianTransactor::new(gateway.clone(), &TransactorConfig::default())
        .expect("default transactor config is valid");
    let pipeline = ContentPipeline::new(
        Arc::new(HeuristicClassifier::new()),
        Arc::new(transactor),
        Arc::new(InMemoryAlertStore::new()),
        AppMetrics::default(),
    );
    (Arc::new(pipeline), gateway)
}

pub struct TestServer {
    pub address: SocketAddr,
    pub server_handle: task::JoinHandle<std::io::Result<()>>,
    pub client: Client,
    pub pipeline: Arc<ContentPipeline>,
    shutdown: CancellationToken,
}

impl TestServer {
    pub async fn new() -> Self {
        let (pipeline, gateway) = create_offline_pipeline();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
        let address = listener.local_addr().expect("Failed to get address");

        let shutdown = CancellationToken::new();
        let state = ApiState::new(pipeline.clone(), gateway);
        let server_handle = task::spawn(http_server::serve(listener, state, shutdown.clone()));

        Self { address, server_handle, client: Client::new(), pipeline, shutdown }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        let url = format!("http://{}{}", self.address, path);
        self.client.get(&url).send().await.expect("Request failed")
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("http://{}{}", self.address, path);
        self.client.post(&url)
    }

    pub async fn analyze(&self, content: &str, author: &str) -> reqwest::Response {
        self.post("/analyze-content")
            .json(&serde_json::json!({ "content": content, "author_address": author }))
            .send()
            .await
            .expect("Request failed")
    }

    pub async fn cleanup(self) {
        self.shutdown.cancel();
        let result = self.server_handle.await.expect("server task panicked");
        assert!(result.is_ok(), "server exited with {result:?}");
    }
}
