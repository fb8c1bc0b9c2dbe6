use crate::helpers::*;

const ZERO_HASH: &str = "0x0000000000000000000000000000000000000000000000000000000000000000";

#[tokio::test]
async fn safe_content_returns_verdict_without_flagging_fields() {
    let server = TestServer::new().await;

    let resp = server.analyze("Hello, nice weather today", AUTHOR).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["classification"], "SAFE");
    assert_eq!(body["reasoning"], "Content appears safe");
    assert_eq!(body["content"], "Hello, nice weather today");
    assert_eq!(body["author_address"], AUTHOR);
    assert!(body["timestamp"].as_u64().is_some());
    assert!(body.get("tx_hash").is_none());
    assert!(body.get("cross_chain_action").is_none());

    server.cleanup().await;
}

#[tokio::test]
async fn malicious_content_with_offline_chain_reports_sentinel() {
    let server = TestServer::new().await;

    let resp = server.analyze("URGENT: claim now, free prize!", AUTHOR).await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["classification"], "MALICIOUS");
    assert_eq!(body["reasoning"], "urgent");
    assert_eq!(body["tx_hash"], ZERO_HASH);
    let action = body["cross_chain_action"].as_str().unwrap();
    assert!(action.starts_with("Not flagged: "), "unexpected action {action}");

    server.cleanup().await;
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let server = TestServer::new().await;

    let resp = server
        .post("/analyze-content")
        .json(&serde_json::json!({ "content": "no author" }))
        .send()
        .await
        .expect("Request failed");

    assert!(resp.status().is_client_error());
    assert!(server.pipeline.alerts().is_empty());

    server.cleanup().await;
}

#[tokio::test]
async fn concurrent_submissions_are_all_recorded() {
    let server = TestServer::new().await;

    let requests = (0..10).map(|i| {
        let content = format!("phishing attempt #{i}");
        let server = &server;
        async move { server.analyze(&content, AUTHOR).await.status() }
    });
    let statuses = futures::future::join_all(requests).await;

    assert!(statuses.iter().all(|status| *status == 200));
    assert_eq!(server.pipeline.alerts().len(), 10);
    assert_eq!(server.pipeline.metrics().snapshot().await.malicious, 10);

    server.cleanup().await;
}
