//! Logging initialization
//!
//! All binaries log through `tracing` to stderr. Stdout is reserved for the
//! sidecar's port announcement line.

use crate::error::CommonError;
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_directive` is used
/// (e.g. `"portlink_sidecar=info,tower_http=info"`).
pub fn init(default_directive: &str) -> Result<(), CommonError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| CommonError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| CommonError::Logging(e.to_string()))
}
