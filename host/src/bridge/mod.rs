//! Credential bridge
//!
//! Loopback HTTP server that hands stored API keys to the sidecar. Every
//! request must carry the per-session bearer token.

mod auth;
mod error;

pub use auth::require_bearer;
pub use error::BridgeError;

use crate::credentials::ApiKeys;
use crate::error::HostError;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use portlink_common::protocol::ApiKeyResponse;
use std::sync::Arc;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Shared state of the bridge handlers
#[derive(Clone)]
pub struct BridgeState {
    token: Arc<str>,
    api_keys: ApiKeys,
}

impl BridgeState {
    /// Bridge state for a session token
    pub fn new(token: impl Into<Arc<str>>, api_keys: ApiKeys) -> Self {
        Self {
            token: token.into(),
            api_keys,
        }
    }
}

/// Bridge router
pub fn create_router(state: BridgeState) -> Router {
    Router::new()
        .route("/api-key/:service", get(get_api_key))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api-key/:service
async fn get_api_key(
    State(state): State<BridgeState>,
    Path(service): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ApiKeyResponse>, BridgeError> {
    if let Err(e) = require_bearer(&headers, &state.token) {
        warn!(service = %service, "Rejected bridge request with invalid token");
        return Err(e);
    }

    match state.api_keys.get_api_key(&service)? {
        Some(key) => {
            debug!(service = %service, "Served API key to sidecar");
            Ok(Json(ApiKeyResponse { key }))
        }
        None => Err(BridgeError::NotFound(service)),
    }
}

/// Running bridge server
pub struct BridgeHandle {
    port: u16,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl BridgeHandle {
    /// Port the bridge listens on
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stop serving and wait for the server task
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!(error = %e, "Bridge server task failed");
        }
        info!("Bridge server stopped");
    }
}

/// Bind an ephemeral loopback port and serve the bridge in the background
pub async fn start_bridge(state: BridgeState) -> Result<BridgeHandle, HostError> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(HostError::BridgeBind)?;
    let port = listener.local_addr().map_err(HostError::BridgeBind)?.port();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = create_router(state);
    let task = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
        if let Err(e) = result {
            warn!(error = %e, "Bridge server exited with error");
        }
    });

    info!("Bridge server listening on http://127.0.0.1:{}", port);
    Ok(BridgeHandle {
        port,
        shutdown: Some(shutdown_tx),
        task,
    })
}
