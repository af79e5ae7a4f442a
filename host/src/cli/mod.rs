//! CLI module for portlink-host
//!
//! Without a subcommand the host serves: it starts the bridge, launches the
//! sidecar and runs until Ctrl+C.

pub mod api_key;
pub mod serve;

use crate::credentials::{CredentialStore, KeyringCredentialStore, MemoryCredentialStore};
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;

/// Portlink host - runs the credential bridge and supervises the sidecar
#[derive(Parser, Debug)]
#[command(name = "portlink-host")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    PORTLINK_SIDECAR_BIN                   Sidecar executable (default: next to this binary)
    PORTLINK_SIDECAR_STARTUP_TIMEOUT_SECS  Port announcement timeout (default: 30)
    PORTLINK_KEYCHAIN_PREFIX               Credential namespace (default: dev.portlink)
    PORTLINK_CREDENTIAL_STORE              keychain | memory (default: keychain)
    RUST_LOG                               Log filter (default: info)
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Serve options used when no subcommand is given
    #[command(flatten)]
    pub serve: serve::ServeArgs,

    /// Credential namespace
    #[arg(
        long,
        global = true,
        default_value = "dev.portlink",
        env = "PORTLINK_KEYCHAIN_PREFIX"
    )]
    pub keychain_prefix: String,

    /// Where API keys are stored
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = CredentialBackend::Keychain,
        env = "PORTLINK_CREDENTIAL_STORE"
    )]
    pub credential_store: CredentialBackend,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the bridge and the sidecar (default)
    Serve(serve::ServeArgs),
    /// Manage stored API keys
    ApiKey(api_key::ApiKeyArgs),
}

/// Credential storage backend
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialBackend {
    /// OS keychain
    Keychain,
    /// Process memory, lost on exit
    Memory,
}

impl CredentialBackend {
    /// Open the selected store
    pub fn open(self) -> Arc<dyn CredentialStore> {
        match self {
            CredentialBackend::Keychain => Arc::new(KeyringCredentialStore),
            CredentialBackend::Memory => Arc::new(MemoryCredentialStore::default()),
        }
    }
}
