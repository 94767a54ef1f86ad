use super::*;
use crate::Config;
use crate::downloader::test_helpers::{FakeClient, fast_config, wait_for_event};
use crate::status::AppStatus;
use crate::types::Event;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

mod system;

/// Helper to create a controller and its router from one configuration
fn create_test_app(config: Config, client: FakeClient) -> (Arc<SmartDownloader>, Router) {
    let downloader =
        crate::downloader::test_helpers::create_test_downloader_with(config, Arc::new(client));
    let downloader = Arc::new(downloader);
    let app = create_router(downloader.clone(), downloader.get_config());
    (downloader, app)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send one request and decode the JSON body
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn test_api_server_spawns() {
    let mut config = fast_config();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let (downloader, _app) = create_test_app(config, FakeClient::succeeding());

    let api_handle = downloader.spawn_api_server();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(!api_handle.is_finished(), "server should still be running");
    api_handle.abort();
}

#[tokio::test]
async fn test_cors_enabled() {
    let (_downloader, app) = create_test_app(fast_config(), FakeClient::succeeding());

    let request = Request::builder()
        .uri("/api/v1/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let mut config = fast_config();
    config.server.api.cors_enabled = false;
    let (_downloader, app) = create_test_app(config, FakeClient::succeeding());

    let request = Request::builder()
        .uri("/api/v1/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (_downloader, app) = create_test_app(fast_config(), FakeClient::succeeding());

    let (status, _) = send(&app, get("/api/v1/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
