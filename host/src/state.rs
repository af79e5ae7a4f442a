//! Host session state
//!
//! Shared between the bridge, the launcher and the status query.

use crate::events::{HostEvent, HostEventBus};
use async_trait::async_trait;
use portlink_client::{ControlSurface, DiscoveryError};
use portlink_common::protocol::{ServerStatus, SERVER_READY_EVENT};
use std::sync::RwLock;
use tokio::process::Child;
use tokio::sync::Mutex;
use tracing::debug;

/// Per-session host state
pub struct HostState {
    bridge_token: String,
    bridge_port: u16,
    sidecar_port: RwLock<Option<u16>>,
    sidecar: Mutex<Option<Child>>,
    events: HostEventBus,
}

impl HostState {
    /// 新しいホスト状態を作成
    pub fn new(bridge_token: impl Into<String>, bridge_port: u16, events: HostEventBus) -> Self {
        Self {
            bridge_token: bridge_token.into(),
            bridge_port,
            sidecar_port: RwLock::new(None),
            sidecar: Mutex::new(None),
            events,
        }
    }

    /// Bearer token the sidecar must present to the bridge
    pub fn bridge_token(&self) -> &str {
        &self.bridge_token
    }

    /// Port the bridge listens on
    pub fn bridge_port(&self) -> u16 {
        self.bridge_port
    }

    /// Base URL handed to the sidecar
    pub fn bridge_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.bridge_port)
    }

    /// Host event bus
    pub fn events(&self) -> &HostEventBus {
        &self.events
    }

    /// Announced sidecar port, if the sidecar is running
    pub fn sidecar_port(&self) -> Option<u16> {
        *self
            .sidecar_port
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_sidecar_port(&self, port: Option<u16>) {
        *self
            .sidecar_port
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = port;
    }

    /// `{ running, port }` snapshot
    pub fn server_status(&self) -> ServerStatus {
        let port = self.sidecar_port();
        ServerStatus {
            running: port.is_some(),
            port,
        }
    }

    /// Record a started sidecar and announce it
    pub(crate) async fn attach_sidecar(&self, child: Child, port: u16) {
        *self.sidecar.lock().await = Some(child);
        self.set_sidecar_port(Some(port));
        debug!(event = SERVER_READY_EVENT, port, "Announcing sidecar");
        self.events.publish(HostEvent::ServerReady { port });
    }

    /// Take the sidecar child, clearing the recorded port
    pub(crate) async fn detach_sidecar(&self) -> Option<Child> {
        let child = self.sidecar.lock().await.take();
        self.set_sidecar_port(None);
        child
    }
}

#[async_trait]
impl ControlSurface for HostState {
    async fn server_status(&self) -> Result<ServerStatus, DiscoveryError> {
        Ok(HostState::server_status(self))
    }
}
