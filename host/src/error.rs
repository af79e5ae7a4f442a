//! エラー型定義

use std::time::Duration;
use thiserror::Error;

/// Host infrastructure error type
#[derive(Debug, Error)]
pub enum HostError {
    /// Failed to bind the bridge listener
    #[error("Failed to bind bridge server: {0}")]
    BridgeBind(#[source] std::io::Error),

    /// Failed to spawn the sidecar process
    #[error("Failed to spawn sidecar {program}: {source}")]
    Spawn {
        /// Program that was executed
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The sidecar's stdout was not captured
    #[error("Failed to capture sidecar stdout")]
    StdoutUnavailable,

    /// Reading the sidecar's stdout failed
    #[error("Failed to read sidecar output: {0}")]
    Output(#[source] std::io::Error),

    /// The sidecar printed a malformed port announcement
    #[error("Invalid sidecar port announcement: {0}")]
    InvalidPortAnnouncement(String),

    /// The sidecar closed stdout before announcing a port
    #[error("Sidecar exited without reporting a port")]
    SidecarExited,

    /// No port announcement within the startup timeout
    #[error("Sidecar did not report a port within {0:?}")]
    StartupTimeout(Duration),

    /// Stopping the sidecar failed
    #[error("Failed to stop sidecar: {0}")]
    Stop(String),
}
