//! Readiness-gated sidecar client
//!
//! # Discovery
//!
//! `initialize()` starts two attempts at once: a subscription to the host's
//! ready event and a one-shot status query. Whichever reports a port first
//! settles the shared endpoint; the other result is dropped. The endpoint is
//! settled at most once per client and never reset.
//!
//! Waiting is unbounded unless [`ClientOptions::discovery_timeout`] is set:
//! a request issued while the sidecar never starts suspends until it is
//! dropped.

use crate::discovery::{ControlSurface, ReadyNotifier};
use crate::error::ClientError;
use crate::request::{merge_headers, RequestOptions};
use portlink_common::protocol::ServerStatus;
use serde::de::DeserializeOwned;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Address of the running sidecar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Loopback host
    pub host: IpAddr,
    /// Listening port
    pub port: u16,
}

impl Endpoint {
    /// Loopback endpoint on `port`
    pub fn localhost(port: u16) -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port,
        }
    }

    /// `http://<host>:<port>`
    pub fn base_url(&self) -> String {
        match self.host {
            IpAddr::V4(host) => format!("http://{}:{}", host, self.port),
            IpAddr::V6(host) => format!("http://[{}]:{}", host, self.port),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}

/// Discovery lifecycle: `Undiscovered → Discovering → Ready`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    /// No request or `initialize()` yet
    Undiscovered,
    /// Discovery started, endpoint not known yet
    Discovering,
    /// Endpoint known
    Ready,
}

/// Which source settled the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiscoverySource {
    StatusQuery,
    ReadyEvent,
}

impl fmt::Display for DiscoverySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StatusQuery => f.write_str("status query"),
            Self::ReadyEvent => f.write_str("ready event"),
        }
    }
}

/// Client construction options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Host the sidecar listens on (default: 127.0.0.1)
    pub host: IpAddr,
    /// Upper bound on the discovery wait (default: none, wait indefinitely)
    pub discovery_timeout: Option<Duration>,
    /// Shared HTTP client
    pub http: reqwest::Client,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            discovery_timeout: None,
            http: reqwest::Client::new(),
        }
    }
}

/// HTTP client that waits for sidecar discovery before sending requests
///
/// Cloning is cheap; clones share the discovery state.
#[derive(Clone)]
pub struct SidecarClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    host: IpAddr,
    discovery_timeout: Option<Duration>,
    control: Arc<dyn ControlSurface>,
    notifier: Arc<dyn ReadyNotifier>,
    started: AtomicBool,
    endpoint: watch::Sender<Option<Endpoint>>,
}

impl Inner {
    /// Settle the endpoint if nobody has yet. Returns true for the winner.
    fn settle(&self, port: u16, source: DiscoverySource) -> bool {
        let endpoint = Endpoint {
            host: self.host,
            port,
        };
        let won = self.endpoint.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(endpoint);
            true
        });

        if won {
            info!(port, source = %source, "Sidecar endpoint discovered");
        } else {
            debug!(port, source = %source, "Ignoring late discovery result");
        }
        won
    }
}

impl fmt::Debug for SidecarClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SidecarClient")
            .field("state", &self.state())
            .field("endpoint", &self.endpoint())
            .finish()
    }
}

impl SidecarClient {
    /// Client with default options
    pub fn new(control: Arc<dyn ControlSurface>, notifier: Arc<dyn ReadyNotifier>) -> Self {
        Self::with_options(control, notifier, ClientOptions::default())
    }

    /// Client with explicit options
    pub fn with_options(
        control: Arc<dyn ControlSurface>,
        notifier: Arc<dyn ReadyNotifier>,
        options: ClientOptions,
    ) -> Self {
        let (endpoint, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                http: options.http,
                host: options.host,
                discovery_timeout: options.discovery_timeout,
                control,
                notifier,
                started: AtomicBool::new(false),
                endpoint,
            }),
        }
    }

    /// Current discovery state
    pub fn state(&self) -> DiscoveryState {
        if self.endpoint().is_some() {
            DiscoveryState::Ready
        } else if self.inner.started.load(Ordering::SeqCst) {
            DiscoveryState::Discovering
        } else {
            DiscoveryState::Undiscovered
        }
    }

    /// Discovered endpoint, if known
    pub fn endpoint(&self) -> Option<Endpoint> {
        *self.inner.endpoint.borrow()
    }

    /// Start discovery. Later calls are no-ops.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn initialize(&self) {
        if self.inner.started.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!("Starting sidecar discovery");

        // Subscribe before querying so an event fired during the query is kept
        let ready = self.inner.notifier.subscribe();
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match ready.await {
                Some(event) => {
                    inner.settle(event.port, DiscoverySource::ReadyEvent);
                }
                None => debug!("Ready event channel closed before any event"),
            }
        });

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match inner.control.server_status().await {
                Ok(ServerStatus {
                    running: true,
                    port: Some(port),
                }) => {
                    inner.settle(port, DiscoverySource::StatusQuery);
                }
                Ok(status) => {
                    debug!(
                        running = status.running,
                        "Sidecar not running yet, waiting for ready event"
                    );
                }
                Err(e) => {
                    warn!(error = %e, "Sidecar status query failed, waiting for ready event");
                }
            }
        });
    }

    /// Wait until the endpoint is known, starting discovery if needed
    pub async fn wait_for_endpoint(&self) -> Result<Endpoint, ClientError> {
        if let Some(endpoint) = self.endpoint() {
            return Ok(endpoint);
        }
        self.initialize();

        let mut rx = self.inner.endpoint.subscribe();
        let wait = async move {
            // The watch guard must not live across an await point
            let endpoint = match rx.wait_for(Option::is_some).await {
                Ok(current) => *current,
                Err(_) => None,
            };
            endpoint.ok_or(ClientError::DiscoveryClosed)
        };

        match self.inner.discovery_timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| ClientError::DiscoveryTimeout(limit))?,
            None => wait.await,
        }
    }

    /// Send a request to `endpoint + path` and decode the JSON body as `T`
    ///
    /// Suspends until discovery resolves. Non-2xx responses fail with
    /// [`ClientError::RequestFailed`]; transport errors are returned as-is.
    /// The body is not validated beyond deserialization into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ClientError> {
        let endpoint = self.wait_for_endpoint().await?;
        let url = format!("{}{}", endpoint.base_url(), path);
        let headers = merge_headers(&options.headers)?;

        debug!(method = %options.method, url = %url, "Sidecar request");

        let mut builder = self.inner.http.request(options.method, &url).headers(headers);
        if let Some(body) = &options.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
