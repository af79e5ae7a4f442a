//! Integration Test: ブリッジクライアント
//!
//! wiremockでブリッジを模擬し、APIキー取得の各応答を確認する

use portlink_sidecar::bridge_client::{BridgeClient, BridgeClientError};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_api_key_found() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api-key/openai"))
        .and(header("authorization", "Bearer session-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "sk-test"})))
        .expect(1)
        .mount(&mock)
        .await;

    let client = BridgeClient::new(mock.uri(), "session-token");
    let key = client.get_api_key("openai").await.unwrap();

    assert_eq!(key, Some("sk-test".to_string()));
}

#[tokio::test]
async fn test_get_api_key_not_found_is_none() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api-key/anthropic"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock)
        .await;

    let client = BridgeClient::new(mock.uri(), "session-token");
    let key = client.get_api_key("anthropic").await.unwrap();

    assert_eq!(key, None);
}

#[tokio::test]
async fn test_get_api_key_unauthorized_is_error() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api-key/openai"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock)
        .await;

    let client = BridgeClient::new(mock.uri(), "wrong-token");
    let err = client.get_api_key("openai").await.unwrap_err();

    match err {
        BridgeClientError::Status { status, service } => {
            assert_eq!(status.as_u16(), 401);
            assert_eq!(service, "openai");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_api_key_server_error_message() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock)
        .await;

    let client = BridgeClient::new(mock.uri(), "session-token");
    let err = client.get_api_key("google").await.unwrap_err();

    assert!(err.to_string().contains("for service \"google\""));
}

#[tokio::test]
async fn test_get_api_key_escapes_service_name() {
    let mock = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api-key/my%20service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"key": "k"})))
        .expect(1)
        .mount(&mock)
        .await;

    let client = BridgeClient::new(mock.uri(), "session-token");
    assert_eq!(
        client.get_api_key("my service").await.unwrap(),
        Some("k".to_string())
    );
}

#[tokio::test]
async fn test_get_api_key_connection_refused_is_transport_error() {
    // Bind then drop to get a port with nothing listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = BridgeClient::new(format!("http://127.0.0.1:{port}"), "session-token");
    let err = client.get_api_key("openai").await.unwrap_err();

    assert!(matches!(err, BridgeClientError::Transport(_)));
}
