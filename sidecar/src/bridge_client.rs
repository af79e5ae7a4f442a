//! Bridge HTTP client
//!
//! Looks up API keys through the host's credential bridge using the
//! per-session bearer token handed to the sidecar at launch.

use portlink_common::{config::SidecarConfig, protocol::ApiKeyResponse};
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tracing::debug;

/// Bridge client error
#[derive(Debug, Error)]
pub enum BridgeClientError {
    /// The configured bridge URL cannot be used as a base URL
    #[error("Invalid bridge URL: {0}")]
    InvalidUrl(String),

    /// The bridge answered with a non-success status other than 404
    #[error("Bridge returned {status} for service \"{service}\"")]
    Status {
        /// HTTP status returned by the bridge
        status: StatusCode,
        /// Requested service
        service: String,
    },

    /// Connection-level failure or undecodable body
    #[error("Bridge request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP client for the host's credential bridge
#[derive(Debug, Clone)]
pub struct BridgeClient {
    http: Client,
    base_url: String,
    token: String,
}

impl BridgeClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:41000`)
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, token)
    }

    /// Create a client reusing an existing connection pool
    pub fn with_client(http: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Create a client from the sidecar configuration
    pub fn from_config(config: &SidecarConfig) -> Self {
        Self::new(config.bridge_url.clone(), config.bridge_token.clone())
    }

    /// Base URL of the bridge
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_key_url(&self, service: &str) -> Result<Url, BridgeClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| BridgeClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| BridgeClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("api-key")
            .push(service);
        Ok(url)
    }

    /// Fetch the API key stored for `service`
    ///
    /// Returns `Ok(None)` when the bridge reports 404 (no key stored).
    pub async fn get_api_key(&self, service: &str) -> Result<Option<String>, BridgeClientError> {
        let url = self.api_key_url(service)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(service = %service, "No API key stored in bridge");
            return Ok(None);
        }

        if !status.is_success() {
            return Err(BridgeClientError::Status {
                status,
                service: service.to_string(),
            });
        }

        let body = response.json::<ApiKeyResponse>().await?;
        Ok(Some(body.key))
    }
}
