//! Bearer token check for bridge requests

use super::error::BridgeError;
use axum::http::{header::AUTHORIZATION, HeaderMap};

/// Require `Authorization: Bearer <expected>` exactly
pub fn require_bearer(headers: &HeaderMap, expected: &str) -> Result<(), BridgeError> {
    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match provided {
        Some(token) if !expected.is_empty() && token == expected => Ok(()),
        _ => Err(BridgeError::Unauthorized),
    }
}
