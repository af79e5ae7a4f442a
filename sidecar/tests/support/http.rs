use std::{net::SocketAddr, time::Duration};

use portlink_common::config::SidecarConfig;
use portlink_sidecar::{server, shutdown::ShutdownController, AppState};
use tokio::{net::TcpListener, task::JoinHandle};

/// テスト用に実ポートで起動したSidecar
pub struct TestSidecar {
    addr: SocketAddr,
    shutdown: ShutdownController,
    handle: JoinHandle<Result<(), portlink_sidecar::error::SidecarError>>,
}

impl TestSidecar {
    /// サーバーがバインドしているアドレスを返す
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://127.0.0.1:<port>` 形式のベースURL
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// サーバーを停止し、バックグラウンドタスクの終了を待つ
    pub async fn stop(self) {
        self.shutdown.request_shutdown();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

/// 任意の設定でSidecarをエフェメラルポートに起動する
pub async fn spawn_sidecar(config: SidecarConfig) -> TestSidecar {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(config);
    let shutdown = state.shutdown.clone();
    let handle = tokio::spawn(server::serve(listener, state));

    TestSidecar {
        addr,
        shutdown,
        handle,
    }
}
