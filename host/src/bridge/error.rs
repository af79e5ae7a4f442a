//! ブリッジのエラーレスポンス型

use crate::credentials::CredentialError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use portlink_common::protocol::ErrorResponse;
use tracing::{debug, error};

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub enum BridgeError {
    /// Missing or wrong bearer token
    Unauthorized,
    /// No key stored for the service
    NotFound(String),
    /// Credential backend failure
    Credential(CredentialError),
}

impl From<CredentialError> for BridgeError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::NoEntry(service) => BridgeError::NotFound(service),
            other => BridgeError::Credential(other),
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> axum::response::Response {
        // Backend details are logged, never returned to the caller
        let (status, message) = match &self {
            BridgeError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            BridgeError::NotFound(service) => {
                debug!(service = %service, "No API key stored");
                (StatusCode::NOT_FOUND, "API key not found")
            }
            BridgeError::Credential(CredentialError::Invalid(_)) => {
                (StatusCode::BAD_REQUEST, "Invalid service")
            }
            BridgeError::Credential(err) => {
                error!(error = %err, "Bridge credential lookup failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Credential lookup failed")
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}
