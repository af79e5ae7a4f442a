//! Portlink common
//!
//! Shared wire types, configuration helpers and error types used by the
//! sidecar, the host and the readiness-gated client.

#![warn(missing_docs)]

/// Environment helpers and the sidecar configuration
pub mod config;

/// Shared error type
pub mod error;

/// Logging initialization
pub mod logging;

/// Wire types exchanged between host, sidecar and client
pub mod protocol;
