//! Shared helpers for host integration tests

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use portlink_common::config::SidecarConfig;
use portlink_host::config::HostConfig;
use portlink_host::credentials::MemoryCredentialStore;
use portlink_sidecar::{server, shutdown::ShutdownController, AppState};
use tokio::{net::TcpListener, task::JoinHandle};

/// In-process sidecar on an ephemeral port
pub struct TestSidecar {
    addr: SocketAddr,
    shutdown: ShutdownController,
    handle: JoinHandle<Result<(), portlink_sidecar::error::SidecarError>>,
}

impl TestSidecar {
    /// 待ち受けポート
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// サーバーを停止する
    pub async fn stop(self) {
        self.shutdown.request_shutdown();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

/// Start a sidecar server in this process
pub async fn spawn_sidecar() -> TestSidecar {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(SidecarConfig::default());
    let shutdown = state.shutdown.clone();
    let handle = tokio::spawn(server::serve(listener, state));

    TestSidecar {
        addr,
        shutdown,
        handle,
    }
}

/// Host configuration whose "sidecar" is a shell script
pub fn shell_sidecar_config(script: &str) -> HostConfig {
    HostConfig {
        sidecar_program: "sh".into(),
        sidecar_args: vec!["-c".to_string(), script.to_string()],
        startup_timeout: Duration::from_secs(5),
        keychain_prefix: "test.portlink".to_string(),
    }
}

/// Empty in-memory credential store
pub fn memory_store() -> Arc<MemoryCredentialStore> {
    Arc::new(MemoryCredentialStore::default())
}
