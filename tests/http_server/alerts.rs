use crate::helpers::*;

#[tokio::test]
async fn alerts_start_empty() {
    let server = TestServer::new().await;

    let resp = server.get("/alerts").await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["alerts"], serde_json::json!([]));

    let resp = server.get("/alerts/latest").await;
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert!(body.is_null());

    server.cleanup().await;
}

#[tokio::test]
async fn alerts_list_malicious_submissions_in_order() {
    let server = TestServer::new().await;

    server.analyze("scam one", AUTHOR).await;
    server.analyze("Hello, nice weather today", AUTHOR).await;
    server.analyze("malware two", "not-an-address").await;

    let body: serde_json::Value =
        server.get("/alerts").await.json().await.expect("Failed to parse JSON");
    let alerts = body["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0]["content"], "scam one");
    assert_eq!(alerts[0]["classification"], "MALICIOUS");
    assert_eq!(alerts[1]["content"], "malware two");
    assert_eq!(alerts[1]["author_address"], "not-an-address");

    let latest: serde_json::Value =
        server.get("/alerts/latest").await.json().await.expect("Failed to parse JSON");
    assert_eq!(latest, alerts[1]);

    server.cleanup().await;
}
