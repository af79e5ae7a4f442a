//! Host configuration

use crate::launcher::SidecarCommand;
use std::path::PathBuf;
use std::time::Duration;

/// Default startup timeout for the sidecar port announcement
pub const DEFAULT_STARTUP_TIMEOUT_SECS: u64 = 30;

/// Default credential namespace
pub const DEFAULT_KEYCHAIN_PREFIX: &str = "dev.portlink";

/// Host configuration
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Sidecar executable
    pub sidecar_program: PathBuf,
    /// Extra sidecar arguments
    pub sidecar_args: Vec<String>,
    /// How long to wait for the port announcement
    pub startup_timeout: Duration,
    /// Credential namespace (`<prefix>.api-key.<service>`)
    pub keychain_prefix: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            sidecar_program: default_sidecar_program(),
            sidecar_args: Vec::new(),
            startup_timeout: Duration::from_secs(DEFAULT_STARTUP_TIMEOUT_SECS),
            keychain_prefix: DEFAULT_KEYCHAIN_PREFIX.to_string(),
        }
    }
}

impl HostConfig {
    /// Command used to launch the sidecar
    pub fn sidecar_command(&self) -> SidecarCommand {
        SidecarCommand {
            program: self.sidecar_program.clone(),
            args: self.sidecar_args.clone(),
        }
    }
}

/// `portlink-sidecar` next to the running executable
pub fn default_sidecar_program() -> PathBuf {
    let name = format!("portlink-sidecar{}", std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&name)))
        .unwrap_or_else(|| PathBuf::from(name))
}
