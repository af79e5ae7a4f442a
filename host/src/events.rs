//! ホストイベントバス
//!
//! Sidecarの起動・停止をクライアントにブロードキャストするための基盤

use futures::future::BoxFuture;
use portlink_client::ReadyNotifier;
use portlink_common::protocol::ServerReady;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// イベントバスのチャネル容量
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// ホストイベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum HostEvent {
    /// Sidecarが待ち受けを開始した (`server-ready`)
    ServerReady {
        /// 待ち受けポート
        port: u16,
    },
    /// Sidecarを停止した
    SidecarStopped,
}

/// ホストイベントバス
#[derive(Clone)]
pub struct HostEventBus {
    sender: broadcast::Sender<HostEvent>,
}

impl Default for HostEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEventBus {
    /// 新しいイベントバスを作成
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// イベントバスを購読
    pub fn subscribe(&self) -> broadcast::Receiver<HostEvent> {
        self.sender.subscribe()
    }

    /// イベントを発行
    ///
    /// 購読者がいない場合でもエラーにはならない
    pub fn publish(&self, event: HostEvent) {
        debug!(?event, "Publishing host event");
        let _ = self.sender.send(event);
    }

    /// 現在の購読者数を取得
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ReadyNotifier for HostEventBus {
    fn subscribe(&self) -> BoxFuture<'static, Option<ServerReady>> {
        let mut receiver = self.sender.subscribe();
        Box::pin(async move {
            loop {
                match receiver.recv().await {
                    Ok(HostEvent::ServerReady { port }) => return Some(ServerReady { port }),
                    Ok(_) => continue,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Ready listener lagged behind host events");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
    }
}
