//! End-to-end pipeline tests: a mocked model API and a mocked destination
//! chain behind the real classifier and transactor.

use std::sync::Arc;

use alloy::primitives::{U64, address, b256};
use guardian_oracle::{
    classifier::create_classifier,
    config::{AppConfig, ClassifierConfig, ClassifierProvider, SecretString, TransactorConfig},
    context::AppMetrics,
    engine::ContentPipeline,
    models::{ContentSubmission, Label},
    persistence::{AlertStore, InMemoryAlertStore},
    providers::{Chain, ChainGateway},
    test_helpers::{TEST_SIGNER_KEY, mock_connection},
    transactor::GuardianTransactor,
};
use mockito::Server;
use serde_json::json;
use url::Url;

const AUTHOR: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

fn model_reply(text: &str) -> String {
    json!({ "choices": [ { "message": { "role": "assistant", "content": text } } ] }).to_string()
}

fn llm_config(endpoint: &str) -> AppConfig {
    AppConfig {
        classifier: ClassifierConfig {
            provider: ClassifierProvider::Llm,
            endpoint: Url::parse(endpoint).unwrap(),
            api_key: Some(SecretString::new("test-api-key")),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_llm_verdict_flags_author_on_destination_chain() {
    let mut server = Server::new_async().await;
    let model = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-api-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(model_reply("MALICIOUS"))
        .create_async()
        .await;

    let (destination, asserter) = mock_connection(Chain::Destination, 43113);
    let gateway = Arc::new(ChainGateway::from_parts(
        None,
        Some(destination),
        None,
        Some(address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512")),
    ));
    let tx_hash = b256!("0x1111111111111111111111111111111111111111111111111111111111111111");
    asserter.push_success(&U64::from(3));
    asserter.push_success(&tx_hash);

    let transactor_config = TransactorConfig {
        private_key: Some(SecretString::new(TEST_SIGNER_KEY)),
        ..Default::default()
    };
    let alerts = Arc::new(InMemoryAlertStore::new());
    let pipeline = ContentPipeline::new(
        create_classifier(&llm_config(&server.url())).unwrap(),
        Arc::new(GuardianTransactor::new(gateway, &transactor_config).unwrap()),
        alerts.clone(),
        AppMetrics::default(),
    );

    let response =
        pipeline.process(&ContentSubmission::new("send me your seed phrase", AUTHOR)).await.unwrap();

    model.assert_async().await;
    assert_eq!(response.classification, Label::Malicious);
    assert_eq!(response.reasoning, "Language model detected potentially harmful content");
    assert_eq!(response.tx_hash, Some(tx_hash));
    assert_eq!(response.cross_chain_action.as_deref(), Some("Address flagged on destination chain"));

    let alert = alerts.latest().unwrap();
    assert_eq!(alert.tx_hash, tx_hash);
    assert!(alert.was_flagged());
    assert_eq!(pipeline.metrics().snapshot().await.flagged, 1);
}

#[tokio::test]
async fn test_unreachable_model_fails_open() {
    let mut server = Server::new_async().await;
    server.mock("POST", "/chat/completions").with_status(500).expect_at_least(1).create_async().await;

    let mut config = llm_config(&server.url());
    config.http_retry_config.max_retries = 0;
    let alerts = Arc::new(InMemoryAlertStore::new());
    let pipeline = ContentPipeline::new(
        create_classifier(&config).unwrap(),
        Arc::new(
            GuardianTransactor::new(Arc::new(ChainGateway::offline()), &TransactorConfig::default())
                .unwrap(),
        ),
        alerts.clone(),
        AppMetrics::default(),
    );

    let response =
        pipeline.process(&ContentSubmission::new("free prize, claim now", AUTHOR)).await.unwrap();

    assert_eq!(response.classification, Label::Safe);
    assert!(response.tx_hash.is_none());
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn test_ambiguous_model_output_is_safe() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(model_reply("Probably MALICIOUS"))
        .create_async()
        .await;

    let alerts = Arc::new(InMemoryAlertStore::new());
    let pipeline = ContentPipeline::new(
        create_classifier(&llm_config(&server.url())).unwrap(),
        Arc::new(
            GuardianTransactor::new(Arc::new(ChainGateway::offline()), &TransactorConfig::default())
                .unwrap(),
        ),
        alerts.clone(),
        AppMetrics::default(),
    );

    let response = pipeline.process(&ContentSubmission::new("hmm", AUTHOR)).await.unwrap();
    assert_eq!(response.classification, Label::Safe);
    assert!(response.reasoning.starts_with("Unrecognised model output"));
    assert_eq!(alerts.list().len(), 0);
}
