//! serve サブコマンド
//!
//! ブリッジを起動し、Sidecarを立ち上げて監視します。

use crate::config::{default_sidecar_program, HostConfig};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Sidecar executable
    #[arg(long, env = "PORTLINK_SIDECAR_BIN")]
    pub sidecar_bin: Option<PathBuf>,

    /// Extra argument passed to the sidecar (repeatable)
    #[arg(long = "sidecar-arg", allow_hyphen_values = true)]
    pub sidecar_args: Vec<String>,

    /// Seconds to wait for the sidecar to report its port
    #[arg(
        long,
        default_value = "30",
        env = "PORTLINK_SIDECAR_STARTUP_TIMEOUT_SECS"
    )]
    pub startup_timeout_secs: u64,
}

impl ServeArgs {
    /// Resolve into a host configuration
    pub fn into_config(self, keychain_prefix: String) -> HostConfig {
        HostConfig {
            sidecar_program: self.sidecar_bin.unwrap_or_else(default_sidecar_program),
            sidecar_args: self.sidecar_args,
            startup_timeout: Duration::from_secs(self.startup_timeout_secs),
            keychain_prefix,
        }
    }
}
