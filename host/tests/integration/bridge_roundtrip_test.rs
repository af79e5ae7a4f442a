//! Integration Test: sidecar bridge client against the host bridge

use portlink_host::config::HostConfig;
use portlink_sidecar::bridge_client::{BridgeClient, BridgeClientError};
use reqwest::StatusCode;

use crate::support::memory_store;

#[tokio::test]
async fn test_sidecar_fetches_stored_key_through_bridge() {
    let host = portlink_host::start_bridge_only(&HostConfig::default(), memory_store())
        .await
        .unwrap();
    host.api_keys().set_api_key("openai", "sk-live").unwrap();

    let state = host.state();
    let bridge = BridgeClient::new(state.bridge_url(), state.bridge_token());

    assert_eq!(
        bridge.get_api_key("openai").await.unwrap(),
        Some("sk-live".to_string())
    );
    assert_eq!(bridge.get_api_key("anthropic").await.unwrap(), None);

    host.shutdown().await;
}

#[tokio::test]
async fn test_bridge_rejects_other_tokens() {
    let host = portlink_host::start_bridge_only(&HostConfig::default(), memory_store())
        .await
        .unwrap();
    host.api_keys().set_api_key("openai", "sk-live").unwrap();

    let state = host.state();
    let bridge = BridgeClient::new(state.bridge_url(), "not-the-session-token");

    match bridge.get_api_key("openai").await {
        Err(BridgeClientError::Status { status, .. }) => {
            assert_eq!(status, StatusCode::UNAUTHORIZED)
        }
        other => panic!("unexpected result: {other:?}"),
    }

    host.shutdown().await;
}

#[tokio::test]
async fn test_each_session_gets_a_fresh_token() {
    let first = portlink_host::start_bridge_only(&HostConfig::default(), memory_store())
        .await
        .unwrap();
    let second = portlink_host::start_bridge_only(&HostConfig::default(), memory_store())
        .await
        .unwrap();

    assert_ne!(first.state().bridge_token(), second.state().bridge_token());
    assert_eq!(first.state().bridge_token().len(), 36);
    assert_ne!(first.state().bridge_port(), second.state().bridge_port());

    first.shutdown().await;
    second.shutdown().await;
}
