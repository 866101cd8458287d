use serde_json::{Value, json};

use crate::test_utils::TestContext;

#[tokio::test]
async fn test_health_reports_ok() {
    let (server, _) = TestContext::new().build_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_version_reports_package_and_subscribers() {
    let (server, state) = TestContext::new().build_server();
    let _events = state.notifier.subscribe();

    let response = server.get("/version").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["name"], "slotbook-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["push_subscribers"], 1);
}
