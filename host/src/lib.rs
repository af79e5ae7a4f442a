//! Portlink host
//!
//! Owns the session: generates the bridge token, serves stored API keys to
//! the sidecar over the bridge, launches and stops the sidecar, and exposes
//! the status query and ready events the client discovers it through.

#![warn(missing_docs)]

/// Credential bridge server
pub mod bridge;

/// Command-line interface
pub mod cli;

/// Host configuration
pub mod config;

/// API key storage
pub mod credentials;

/// Error types
pub mod error;

/// Host event bus
pub mod events;

/// Sidecar process management
pub mod launcher;

/// Session state
pub mod state;

use crate::bridge::{BridgeHandle, BridgeState};
use crate::config::HostConfig;
use crate::credentials::{ApiKeys, CredentialStore};
use crate::error::HostError;
use crate::events::HostEventBus;
use crate::state::HostState;
use portlink_client::{ClientOptions, SidecarClient};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Running host infrastructure
pub struct Host {
    state: Arc<HostState>,
    api_keys: ApiKeys,
    bridge: BridgeHandle,
    launch: Option<JoinHandle<()>>,
}

/// Start the bridge, then launch the sidecar in the background
///
/// Returns once the bridge is listening. The sidecar's readiness is
/// published on the event bus and reflected in the status query.
pub async fn start_infrastructure(
    config: &HostConfig,
    store: Arc<dyn CredentialStore>,
) -> Result<Host, HostError> {
    let mut host = start_bridge_only(config, store).await?;

    let state = host.state.clone();
    let command = config.sidecar_command();
    let startup_timeout = config.startup_timeout;
    host.launch = Some(tokio::spawn(async move {
        if let Err(e) = launcher::start_sidecar(&state, &command, startup_timeout).await {
            error!(error = %e, "Failed to start sidecar");
        }
    }));

    Ok(host)
}

/// Start the session and bridge without launching a sidecar
pub async fn start_bridge_only(
    config: &HostConfig,
    store: Arc<dyn CredentialStore>,
) -> Result<Host, HostError> {
    let token = Uuid::new_v4().to_string();
    info!("Generated bridge token for this session");

    let api_keys = ApiKeys::new(store, config.keychain_prefix.clone());
    let bridge = bridge::start_bridge(BridgeState::new(token.as_str(), api_keys.clone())).await?;
    let state = Arc::new(HostState::new(token, bridge.port(), HostEventBus::new()));

    Ok(Host {
        state,
        api_keys,
        bridge,
        launch: None,
    })
}

impl Host {
    /// Session state
    pub fn state(&self) -> Arc<HostState> {
        self.state.clone()
    }

    /// API key commands
    pub fn api_keys(&self) -> &ApiKeys {
        &self.api_keys
    }

    /// Host event bus
    pub fn events(&self) -> &HostEventBus {
        self.state.events()
    }

    /// Client wired to this host's status query and ready events
    pub fn client(&self, options: ClientOptions) -> SidecarClient {
        SidecarClient::with_options(
            self.state.clone(),
            Arc::new(self.state.events().clone()),
            options,
        )
    }

    /// Stop the sidecar and the bridge
    pub async fn shutdown(mut self) {
        if let Some(launch) = self.launch.take() {
            // Dropping an unfinished launch kills the half-started child
            launch.abort();
            let _ = launch.await;
        }
        if let Err(e) = launcher::stop_sidecar(&self.state).await {
            warn!(error = %e, "Failed to stop sidecar cleanly");
        }
        self.bridge.stop().await;
        info!("Host shutdown complete");
    }
}
