//! Discovery collaborators
//!
//! The client learns the sidecar port from two sources owned by the host:
//! a request/response status query and a one-shot ready notification.

use crate::error::DiscoveryError;
use async_trait::async_trait;
use futures::future::BoxFuture;
use portlink_common::protocol::{ServerReady, ServerStatus};

/// Status query against the host (`{ running, port }`)
#[async_trait]
pub trait ControlSurface: Send + Sync {
    /// Current sidecar status
    async fn server_status(&self) -> Result<ServerStatus, DiscoveryError>;
}

/// Subscription to the host's `server-ready` notifications
pub trait ReadyNotifier: Send + Sync {
    /// Subscribe to the next ready event
    ///
    /// The subscription must be registered before this returns, so an event
    /// published after the call is never missed. The future resolves with the
    /// first ready event, or `None` if the channel closes first.
    fn subscribe(&self) -> BoxFuture<'static, Option<ServerReady>>;
}
