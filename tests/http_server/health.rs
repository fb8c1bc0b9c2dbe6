use crate::helpers::*;

#[tokio::test]
async fn health_endpoint_reports_running_and_chain_state() {
    let server = TestServer::new().await;

    let resp = server.get("/").await;

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "running");
    assert_eq!(body["classifier"], "heuristic");
    assert_eq!(body["source_connected"], false);
    assert_eq!(body["destination_connected"], false);

    server.cleanup().await;
}
