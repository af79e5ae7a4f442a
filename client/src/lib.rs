//! Portlink client
//!
//! Readiness-gated HTTP client for the sidecar. The sidecar's port is not
//! known when the client is created; it is learned once, either from the
//! host's status query or from its `server-ready` event, and every request
//! waits on that single discovery.

#![warn(missing_docs)]

/// Readiness-gated client
pub mod client;

/// Discovery collaborators (status query, ready events)
pub mod discovery;

/// Error types
pub mod error;

/// Request options and header merging
pub mod request;

/// Typed helpers for the sidecar routes
pub mod services;

pub use client::{ClientOptions, DiscoveryState, Endpoint, SidecarClient};
pub use discovery::{ControlSurface, ReadyNotifier};
pub use error::{ClientError, DiscoveryError};
pub use request::RequestOptions;
