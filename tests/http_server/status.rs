use crate::helpers::*;

#[tokio::test]
async fn status_endpoint_returns_counters() {
    let server = TestServer::new().await;

    server.analyze("gm", AUTHOR).await;
    server.analyze("act fast, exclusive offer", AUTHOR).await;

    let resp = server.get("/status").await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_secs"].as_u64().is_some());
    assert_eq!(body["analyzed"], 2);
    assert_eq!(body["safe"], 1);
    assert_eq!(body["malicious"], 1);
    assert_eq!(body["flagged"], 0);
    assert!(body["latest_processed_block"].is_null());

    server.cleanup().await;
}
