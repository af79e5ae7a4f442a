//! Client error types

use std::time::Duration;
use thiserror::Error;

/// Errors returned by [`crate::SidecarClient::request`]
#[derive(Debug, Error)]
pub enum ClientError {
    /// The sidecar answered with a non-success status
    #[error("Sidecar request failed: {status} {status_text}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase (may be empty)
        status_text: String,
    },

    /// Connection refused, DNS failure, timeout and other transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected type
    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// A caller-supplied header name or value is not valid HTTP
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Discovery did not complete within the configured timeout
    #[error("Sidecar discovery timed out after {0:?}")]
    DiscoveryTimeout(Duration),

    /// The discovery signal was dropped before resolving
    #[error("Sidecar discovery was closed before an endpoint was known")]
    DiscoveryClosed,
}

/// Errors reported by a [`crate::ControlSurface`]
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The control surface could not be reached
    #[error("Control surface unavailable: {0}")]
    Unavailable(String),

    /// The control surface returned something unusable
    #[error("Invalid status response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// HTTP status carried by a `RequestFailed` error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
