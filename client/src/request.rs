//! Request options and header merging

use crate::error::ClientError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use std::time::Duration;

/// Options for a single sidecar request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method (default: GET)
    pub method: Method,
    /// Caller headers; they override the defaults on conflict
    pub headers: Vec<(String, String)>,
    /// JSON body
    pub body: Option<serde_json::Value>,
    /// Per-request timeout (default: none)
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }
}

impl RequestOptions {
    /// GET with no body
    pub fn get() -> Self {
        Self::default()
    }

    /// POST with a JSON body
    pub fn post(body: serde_json::Value) -> Self {
        Self::with_method(Method::POST).json(body)
    }

    /// PUT with a JSON body
    pub fn put(body: serde_json::Value) -> Self {
        Self::with_method(Method::PUT).json(body)
    }

    /// DELETE with no body
    pub fn delete() -> Self {
        Self::with_method(Method::DELETE)
    }

    /// Options with an explicit method
    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the JSON body
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Default headers merged with caller headers; the caller wins on conflict
///
/// Header names compare case-insensitively.
pub fn merge_headers(caller: &[(String, String)]) -> Result<HeaderMap, ClientError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in caller {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ClientError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ClientError::InvalidHeader(format!("{}: <invalid value>", name)))?;
        headers.insert(name, value);
    }

    Ok(headers)
}
