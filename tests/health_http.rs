mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use common::app::spawn_test_app;

#[tokio::test]
async fn it_health_live_and_ready() {
    let app = spawn_test_app().await;
    let server = TestServer::new(app.app.clone()).expect("test server");

    server.get("/health/live").await.assert_status_ok();
    server.get("/health/ready").await.assert_status_ok();
}

#[tokio::test]
async fn it_health_reports_catalog_and_store() {
    let app = spawn_test_app().await;
    let server = TestServer::new(app.app.clone()).expect("test server");

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"]["healthy"], true);
    assert_eq!(body["catalogWords"], app.state.catalog().len());

    let database = server.get("/health/database").await;
    database.assert_status_ok();
    let body: Value = database.json();
    assert_eq!(body["healthy"], true);
    assert!(body["latencyUs"].is_u64());
}

#[tokio::test]
async fn it_unknown_route_is_json_404_with_trace_id() {
    let app = spawn_test_app().await;
    let server = TestServer::new(app.app.clone()).expect("test server");

    let response = server
        .get("/api/nope")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static("req-123"),
        )
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.header("x-request-id"), "req-123");

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["traceId"], "req-123");
}

#[tokio::test]
async fn it_invalid_request_id_is_replaced() {
    let app = spawn_test_app().await;
    let server = TestServer::new(app.app.clone()).expect("test server");

    let response = server
        .get("/health/live")
        .add_header(
            axum::http::HeaderName::from_static("x-request-id"),
            axum::http::HeaderValue::from_static("bad id!"),
        )
        .await;
    let id = response.header("x-request-id");
    let id = id.to_str().unwrap();
    assert_ne!(id, "bad id!");
    assert!(uuid::Uuid::parse_str(id).is_ok());
}
