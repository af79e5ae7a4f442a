//! Integration Test: Sidecar HTTP API over a real socket

use portlink_common::config::SidecarConfig;
use portlink_common::protocol::{AiStatus, HealthResponse};
use reqwest::Client;

use crate::support::http::spawn_sidecar;

#[tokio::test]
async fn test_health_over_loopback() {
    let sidecar = spawn_sidecar(SidecarConfig::default()).await;

    let response = Client::new()
        .get(format!("{}/health", sidecar.base_url()))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: HealthResponse = response.json().await.unwrap();
    assert_eq!(body, HealthResponse::ok());

    sidecar.stop().await;
}

#[tokio::test]
async fn test_ai_status_over_loopback() {
    let sidecar = spawn_sidecar(SidecarConfig::default()).await;

    let body: AiStatus = Client::new()
        .get(format!("{}/ai/status", sidecar.base_url()))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(!body.available);

    sidecar.stop().await;
}

#[tokio::test]
async fn test_custom_origin_is_allowed() {
    let config = SidecarConfig {
        allowed_origins: vec!["http://localhost:5173".to_string()],
        ..SidecarConfig::default()
    };
    let sidecar = spawn_sidecar(config).await;

    let response = Client::new()
        .get(format!("{}/health", sidecar.base_url()))
        .header("origin", "http://localhost:5173")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );

    sidecar.stop().await;
}

#[tokio::test]
async fn test_server_stops_on_shutdown_request() {
    let sidecar = spawn_sidecar(SidecarConfig::default()).await;
    let addr = sidecar.addr();
    sidecar.stop().await;

    let result = Client::new()
        .get(format!("http://{}/health", addr))
        .send()
        .await;
    assert!(result.is_err());
}
