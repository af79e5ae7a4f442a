//! API key management
//!
//! Keys live behind a [`CredentialStore`] keyed by
//! `<prefix>.api-key.<service>`. Listing reports only whether a key exists;
//! values are handed out through the bridge alone.

use portlink_common::protocol::ApiKeyEntry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::info;

/// Account name used for every API key entry
pub const KEYCHAIN_ACCOUNT: &str = "api-key";

/// Known API key services and their display names
pub const KNOWN_SERVICES: &[(&str, &str)] = &[
    ("openai", "OpenAI"),
    ("anthropic", "Anthropic"),
    ("google", "Google AI"),
];

/// Credential store error
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Nothing stored under the requested entry
    #[error("No credential stored for {0}")]
    NoEntry(String),

    /// Rejected input (empty service or key)
    #[error("Invalid credential request: {0}")]
    Invalid(String),

    /// The storage backend failed
    #[error("Credential backend error: {0}")]
    Backend(String),
}

/// Secret storage backend (OS keychain, in-memory, ...)
pub trait CredentialStore: Send + Sync {
    /// Read a secret
    fn get(&self, service: &str, account: &str) -> Result<String, CredentialError>;
    /// Write or replace a secret
    fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), CredentialError>;
    /// Remove a secret
    fn delete(&self, service: &str, account: &str) -> Result<(), CredentialError>;
}

/// Process-local credential store
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    entries: RwLock<HashMap<(String, String), String>>,
}

impl MemoryCredentialStore {
    fn poisoned() -> CredentialError {
        CredentialError::Backend("credential store lock poisoned".to_string())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, service: &str, account: &str) -> Result<String, CredentialError> {
        let entries = self.entries.read().map_err(|_| Self::poisoned())?;
        entries
            .get(&(service.to_string(), account.to_string()))
            .cloned()
            .ok_or_else(|| CredentialError::NoEntry(service.to_string()))
    }

    fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), CredentialError> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries.insert((service.to_string(), account.to_string()), secret.to_string());
        Ok(())
    }

    fn delete(&self, service: &str, account: &str) -> Result<(), CredentialError> {
        let mut entries = self.entries.write().map_err(|_| Self::poisoned())?;
        entries
            .remove(&(service.to_string(), account.to_string()))
            .map(|_| ())
            .ok_or_else(|| CredentialError::NoEntry(service.to_string()))
    }
}

/// OS keychain store (macOS Keychain, Windows Credential Manager, Linux keyutils)
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringCredentialStore;

impl KeyringCredentialStore {
    fn entry(service: &str, account: &str) -> Result<keyring::Entry, CredentialError> {
        keyring::Entry::new(service, account).map_err(|e| map_keyring_error(service, e))
    }
}

/// Translate a keychain error, keeping "nothing stored" distinct from failures
pub fn map_keyring_error(service: &str, err: keyring::Error) -> CredentialError {
    match err {
        keyring::Error::NoEntry => CredentialError::NoEntry(service.to_string()),
        other => CredentialError::Backend(other.to_string()),
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn get(&self, service: &str, account: &str) -> Result<String, CredentialError> {
        Self::entry(service, account)?
            .get_password()
            .map_err(|e| map_keyring_error(service, e))
    }

    fn set(&self, service: &str, account: &str, secret: &str) -> Result<(), CredentialError> {
        Self::entry(service, account)?
            .set_password(secret)
            .map_err(|e| map_keyring_error(service, e))
    }

    fn delete(&self, service: &str, account: &str) -> Result<(), CredentialError> {
        Self::entry(service, account)?
            .delete_credential()
            .map_err(|e| map_keyring_error(service, e))
    }
}

/// API key operations over a credential store
#[derive(Clone)]
pub struct ApiKeys {
    store: Arc<dyn CredentialStore>,
    prefix: String,
}

impl ApiKeys {
    /// Wrap `store`, namespacing entries under `prefix`
    pub fn new(store: Arc<dyn CredentialStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Full store service name for an API key service
    pub fn keychain_service(&self, service: &str) -> String {
        format!("{}.api-key.{}", self.prefix, service)
    }

    fn validate_service(service: &str) -> Result<(), CredentialError> {
        if service.trim().is_empty() {
            return Err(CredentialError::Invalid("service must not be empty".to_string()));
        }
        Ok(())
    }

    /// Store an API key
    pub fn set_api_key(&self, service: &str, key: &str) -> Result<(), CredentialError> {
        Self::validate_service(service)?;
        if key.is_empty() {
            return Err(CredentialError::Invalid("key must not be empty".to_string()));
        }

        info!("Storing API key for service: {}", service);
        self.store
            .set(&self.keychain_service(service), KEYCHAIN_ACCOUNT, key)?;
        info!("API key stored successfully for service: {}", service);
        Ok(())
    }

    /// Remove an API key
    pub fn delete_api_key(&self, service: &str) -> Result<(), CredentialError> {
        Self::validate_service(service)?;

        info!("Deleting API key for service: {}", service);
        self.store
            .delete(&self.keychain_service(service), KEYCHAIN_ACCOUNT)?;
        info!("API key deleted for service: {}", service);
        Ok(())
    }

    /// Read an API key; `Ok(None)` when none is stored
    pub fn get_api_key(&self, service: &str) -> Result<Option<String>, CredentialError> {
        Self::validate_service(service)?;

        match self
            .store
            .get(&self.keychain_service(service), KEYCHAIN_ACCOUNT)
        {
            Ok(key) => Ok(Some(key)),
            Err(CredentialError::NoEntry(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Whether a key exists (never exposes the value)
    pub fn has_api_key(&self, service: &str) -> Result<bool, CredentialError> {
        self.get_api_key(service).map(|key| key.is_some())
    }

    /// Known services with their storage status
    pub fn list_api_key_services(&self) -> Vec<ApiKeyEntry> {
        KNOWN_SERVICES
            .iter()
            .map(|(service, display_name)| ApiKeyEntry {
                service: service.to_string(),
                display_name: display_name.to_string(),
                has_key: self.has_api_key(service).unwrap_or(false),
            })
            .collect()
    }
}
