//! Integration Test: request contract against a discovered endpoint

use std::time::Duration;

use portlink_client::{ClientError, RequestOptions};
use portlink_common::protocol::{AiStatus, HealthResponse};
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::ready_client;

#[tokio::test]
async fn test_health_returns_ok_body() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&mock)
        .await;

    let client = ready_client(mock.address().port()).await;
    let body = client.health().await.unwrap();

    assert_eq!(body, HealthResponse::ok());
}

#[tokio::test]
async fn test_missing_route_fails_with_status() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock)
        .await;

    let client = ready_client(mock.address().port()).await;
    let err = client
        .request::<serde_json::Value>("/missing", RequestOptions::get())
        .await
        .unwrap_err();

    match err {
        ClientError::RequestFailed {
            status,
            status_text,
        } => {
            assert_eq!(status, 404);
            assert_eq!(status_text, "Not Found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_carries_status() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock)
        .await;

    let client = ready_client(mock.address().port()).await;
    let err = client.ai_status().await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(
        err.to_string(),
        "Sidecar request failed: 503 Service Unavailable"
    );
}

#[tokio::test]
async fn test_headers_are_merged_with_defaults() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ai/status"))
        .and(header("content-type", "application/json"))
        .and(header("authorization", "Bearer X"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "available": false,
            "message": "AI routes not yet implemented"
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let client = ready_client(mock.address().port()).await;
    let status: AiStatus = client
        .request(
            "/ai/status",
            RequestOptions::get().header("Authorization", "Bearer X"),
        )
        .await
        .unwrap();

    assert!(!status.available);
}

#[tokio::test]
async fn test_caller_content_type_overrides_default() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("content-type", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&mock)
        .await;

    let client = ready_client(mock.address().port()).await;
    let body: HealthResponse = client
        .request(
            "/health",
            RequestOptions::get().header("Content-Type", "text/plain"),
        )
        .await
        .unwrap();

    assert_eq!(body.status, "ok");
}

#[tokio::test]
async fn test_post_sends_json_body() {
    #[derive(Debug, Deserialize)]
    struct Echo {
        accepted: bool,
    }

    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ai/chat"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"prompt": "hello"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"accepted": true})))
        .expect(1)
        .mount(&mock)
        .await;

    let client = ready_client(mock.address().port()).await;
    let echo: Echo = client
        .request("/ai/chat", RequestOptions::post(json!({"prompt": "hello"})))
        .await
        .unwrap();

    assert!(echo.accepted);
}

#[tokio::test]
async fn test_body_of_unexpected_shape_fails_to_decode() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock)
        .await;

    let client = ready_client(mock.address().port()).await;
    let err = client.health().await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = ready_client(port).await;
    let err = client.health().await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn test_request_timeout_is_transport_error() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock)
        .await;

    let client = ready_client(mock.address().port()).await;
    let err = client
        .request::<HealthResponse>(
            "/health",
            RequestOptions::get().timeout(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();

    match err {
        ClientError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("unexpected error: {other:?}"),
    }
}
