//! Portlink sidecar
//!
//! Loopback HTTP server started by the desktop host on an ephemeral port

#![warn(missing_docs)]

/// HTTP route handlers
pub mod api;

/// Credential bridge client
pub mod bridge_client;

/// Error types
pub mod error;

/// Server startup and port announcement
pub mod server;

/// Shutdown controller
pub mod shutdown;

use portlink_common::config::SidecarConfig;
use std::sync::Arc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<SidecarConfig>,
    /// API key lookups through the host bridge
    ///
    /// Held for the AI provider routes. The `/ai/status` placeholder does not
    /// read it yet.
    pub bridge: bridge_client::BridgeClient,
    /// Cooperative shutdown controller
    pub shutdown: shutdown::ShutdownController,
}

impl AppState {
    /// Build the state from a loaded configuration
    pub fn new(config: SidecarConfig) -> Self {
        let bridge = bridge_client::BridgeClient::from_config(&config);
        Self {
            config: Arc::new(config),
            bridge,
            shutdown: shutdown::ShutdownController::default(),
        }
    }
}
