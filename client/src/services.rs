//! Typed helpers for the sidecar routes

use crate::client::SidecarClient;
use crate::error::ClientError;
use crate::request::RequestOptions;
use portlink_common::protocol::{AiStatus, HealthResponse};
use tracing::debug;

impl SidecarClient {
    /// GET /health
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.request("/health", RequestOptions::get()).await
    }

    /// GET /ai/status - whether the AI feature is available
    pub async fn ai_status(&self) -> Result<AiStatus, ClientError> {
        debug!("Checking AI status");
        self.request("/ai/status", RequestOptions::get()).await
    }
}
