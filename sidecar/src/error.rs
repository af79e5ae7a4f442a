//! Sidecar error types

use thiserror::Error;

/// Errors raised while starting or running the sidecar server
#[derive(Debug, Error)]
pub enum SidecarError {
    /// Failed to bind the listening socket
    #[error("Failed to bind sidecar listener: {0}")]
    Bind(#[source] std::io::Error),

    /// Failed to write the port announcement to stdout
    #[error("Failed to announce sidecar port: {0}")]
    Announce(#[source] std::io::Error),

    /// The HTTP server stopped with an error
    #[error("Sidecar server error: {0}")]
    Serve(#[source] std::io::Error),
}
