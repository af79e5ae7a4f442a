//! Integration Test: launching and stopping a sidecar process

use std::time::Duration;

use portlink_common::protocol::ServerStatus;
use portlink_host::error::HostError;
use portlink_host::events::{HostEvent, HostEventBus};
use portlink_host::launcher::{start_sidecar, stop_sidecar, SidecarCommand};
use portlink_host::state::HostState;

fn shell(script: &str) -> SidecarCommand {
    SidecarCommand {
        program: "sh".into(),
        args: vec!["-c".to_string(), script.to_string()],
    }
}

#[tokio::test]
async fn test_start_reads_port_and_stop_clears_it() {
    // A numeric token lets the script prove the environment was forwarded
    let state = HostState::new("4567", 9300, HostEventBus::new());
    let mut events = state.events().subscribe();

    let port = start_sidecar(
        &state,
        &shell("echo booting; echo SIDECAR_PORT:$PORTLINK_BRIDGE_TOKEN; exec sleep 30"),
        Duration::from_secs(5),
    )
    .await
    .unwrap();

    assert_eq!(port, 4567);
    assert_eq!(
        state.server_status(),
        ServerStatus {
            running: true,
            port: Some(4567)
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        HostEvent::ServerReady { port: 4567 }
    );

    tokio::time::timeout(Duration::from_secs(5), stop_sidecar(&state))
        .await
        .expect("stop timed out")
        .unwrap();

    assert_eq!(state.server_status(), ServerStatus::default());
    assert_eq!(events.recv().await.unwrap(), HostEvent::SidecarStopped);
}

#[tokio::test]
async fn test_bridge_url_is_forwarded() {
    let state = HostState::new("tok", 9301, HostEventBus::new());

    let port = start_sidecar(
        &state,
        &shell(r#"case "$PORTLINK_BRIDGE_URL" in http://127.0.0.1:9301) echo SIDECAR_PORT:1111;; *) echo SIDECAR_PORT:2222;; esac; exec sleep 30"#),
        Duration::from_secs(5),
    )
    .await
    .unwrap();

    assert_eq!(port, 1111);
    stop_sidecar(&state).await.unwrap();
}

#[tokio::test]
async fn test_exit_before_announcement_fails() {
    let state = HostState::new("tok", 9302, HostEventBus::new());

    let err = start_sidecar(&state, &shell("echo nope"), Duration::from_secs(5))
        .await
        .unwrap_err();

    assert!(matches!(err, HostError::SidecarExited));
    assert_eq!(state.sidecar_port(), None);
}

#[tokio::test]
async fn test_silent_sidecar_hits_startup_timeout() {
    let state = HostState::new("tok", 9303, HostEventBus::new());

    let err = start_sidecar(
        &state,
        &shell("exec sleep 30"),
        Duration::from_millis(200),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, HostError::StartupTimeout(_)));
    assert!(!state.server_status().running);
}
