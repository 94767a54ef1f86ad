use super::*;

#[tokio::test]
async fn test_health_endpoint() {
    let (_downloader, app) = create_test_app(fast_config(), FakeClient::succeeding());

    let (status, body) = send(&app, get("/api/v1/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["session"], "idle");
    assert_eq!(body["analysis_client"], "fake");
}

#[tokio::test]
async fn test_health_treats_blank_credential_as_missing() {
    let mut config = fast_config();
    config.analysis.api_key = Some("   ".to_string());
    let (_downloader, app) = create_test_app(config, FakeClient::succeeding());

    let (_, body) = send(&app, get("/api/v1/health")).await;
    assert_eq!(body["credential_configured"], false);

    let mut config = fast_config();
    config.analysis.api_key = Some("key".to_string());
    let (_downloader, app) = create_test_app(config, FakeClient::succeeding());

    let (_, body) = send(&app, get("/api/v1/health")).await;
    assert_eq!(body["credential_configured"], true);
}

#[tokio::test]
async fn test_openapi_endpoint() {
    let (_downloader, app) = create_test_app(fast_config(), FakeClient::succeeding());

    let (status, body) = send(&app, get("/api/v1/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["openapi"].as_str().unwrap().starts_with("3."));
    assert!(body["paths"]["/api/v1/state"].is_object());
}

#[tokio::test]
async fn test_swagger_ui_enabled() {
    let (_downloader, app) = create_test_app(fast_config(), FakeClient::succeeding());

    let response = app.oneshot(get("/swagger-ui/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_swagger_ui_disabled() {
    let mut config = fast_config();
    config.server.api.swagger_ui = false;
    let (_downloader, app) = create_test_app(config, FakeClient::succeeding());

    let response = app.oneshot(get("/swagger-ui/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_event_stream_content_type() {
    let (_downloader, app) = create_test_app(fast_config(), FakeClient::succeeding());

    let response = app.oneshot(get("/api/v1/events")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(
        content_type
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );
}

#[tokio::test]
async fn test_event_stream_delivers_named_events() {
    use tokio_stream::StreamExt;

    let (downloader, app) = create_test_app(fast_config(), FakeClient::succeeding());

    let response = app.oneshot(get("/api/v1/events")).await.unwrap();
    let mut stream = response.into_body().into_data_stream();

    downloader.submit("https://example.com/v1").await.unwrap();

    let chunk = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let chunk = String::from_utf8(chunk.to_vec()).unwrap();

    assert!(chunk.contains("event: status_changed"), "got {chunk:?}");
    assert!(chunk.contains("\"to\":\"fetching\""), "got {chunk:?}");
}

#[tokio::test]
async fn test_shutdown_endpoint_stops_commands() {
    let (downloader, app) = create_test_app(fast_config(), FakeClient::succeeding());

    let (status, body) = send(&app, post_empty("/api/v1/shutdown")).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "shutdown initiated");
    assert!(downloader.is_shutting_down());

    let (status, body) = send(
        &app,
        post_json(
            "/api/v1/analyze",
            serde_json::json!({"url": "https://example.com"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "shutting_down");
}
