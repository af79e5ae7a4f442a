//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs, and the sidecar
//! configuration handed over by the host process.

use crate::error::CommonError;
use serde::{Deserialize, Serialize};

/// Bridge base URL handed to the sidecar
pub const ENV_BRIDGE_URL: &str = "PORTLINK_BRIDGE_URL";
/// Deprecated name for [`ENV_BRIDGE_URL`]
pub const ENV_BRIDGE_URL_DEPRECATED: &str = "BRIDGE_URL";
/// Per-session bearer token for the bridge
pub const ENV_BRIDGE_TOKEN: &str = "PORTLINK_BRIDGE_TOKEN";
/// Deprecated name for [`ENV_BRIDGE_TOKEN`]
pub const ENV_BRIDGE_TOKEN_DEPRECATED: &str = "BRIDGE_TOKEN";
/// Port the sidecar listens on (0 = pick an ephemeral port)
pub const ENV_SIDECAR_PORT: &str = "PORTLINK_SIDECAR_PORT";
/// Deprecated name for [`ENV_SIDECAR_PORT`]
pub const ENV_SIDECAR_PORT_DEPRECATED: &str = "SIDECAR_PORT";
/// Comma-separated list of CORS origins allowed by the sidecar
pub const ENV_ALLOWED_ORIGINS: &str = "PORTLINK_ALLOWED_ORIGINS";
/// Deprecated name for [`ENV_ALLOWED_ORIGINS`]
pub const ENV_ALLOWED_ORIGINS_DEPRECATED: &str = "ALLOWED_ORIGINS";

/// Read `new_name`, falling back to the pre-`PORTLINK_` name `old_name`
///
/// A value found only under the old name is returned with a deprecation
/// warning.
///
/// ```
/// use portlink_common::config::{get_env_with_fallback, ENV_BRIDGE_URL, ENV_BRIDGE_URL_DEPRECATED};
///
/// let bridge_url = get_env_with_fallback(ENV_BRIDGE_URL, ENV_BRIDGE_URL_DEPRECATED);
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    std::env::var(new_name).ok().or_else(|| {
        let legacy = std::env::var(old_name).ok()?;
        tracing::warn!(
            "{} is deprecated for the sidecar, set {} instead",
            old_name,
            new_name
        );
        Some(legacy)
    })
}

/// [`get_env_with_fallback`] with a default for unset variables
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// [`get_env_with_fallback`] parsed into `T`
///
/// Surrounding whitespace is ignored. Unset or unparsable values yield
/// `default`, so a bad `PORTLINK_SIDECAR_PORT` falls back to an ephemeral port.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

/// Sidecar設定
///
/// ホストプロセスが環境変数経由で渡す値。未設定の場合はデフォルト値を使う。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidecarConfig {
    /// ブリッジのURL (デフォルト: "http://127.0.0.1:9999")
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    /// ブリッジ認証用のBearerトークン (デフォルト: 空文字列)
    #[serde(default)]
    pub bridge_token: String,

    /// 待ち受けポート (デフォルト: 0 = エフェメラルポート)
    #[serde(default)]
    pub port: u16,

    /// CORSで許可するオリジン
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:9999".to_string()
}

/// Webview origins the sidecar accepts by default
pub fn default_allowed_origins() -> Vec<String> {
    vec![
        "tauri://localhost".to_string(),
        "https://tauri.localhost".to_string(),
        "http://localhost:1420".to_string(),
    ]
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
            bridge_token: String::new(),
            port: 0,
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl SidecarConfig {
    /// Load sidecar configuration from environment variables.
    pub fn from_env() -> Self {
        let bridge_url =
            get_env_with_fallback_or(ENV_BRIDGE_URL, ENV_BRIDGE_URL_DEPRECATED, &default_bridge_url());
        let bridge_token =
            get_env_with_fallback_or(ENV_BRIDGE_TOKEN, ENV_BRIDGE_TOKEN_DEPRECATED, "");
        let port = get_env_with_fallback_parse(ENV_SIDECAR_PORT, ENV_SIDECAR_PORT_DEPRECATED, 0u16);
        let allowed_origins =
            get_env_with_fallback(ENV_ALLOWED_ORIGINS, ENV_ALLOWED_ORIGINS_DEPRECATED)
                .map(|raw| parse_origin_list(&raw))
                .filter(|origins| !origins.is_empty())
                .unwrap_or_else(default_allowed_origins);

        Self {
            bridge_url: bridge_url.trim_end_matches('/').to_string(),
            bridge_token,
            port,
            allowed_origins,
        }
    }

    /// Reject values the sidecar cannot run with
    pub fn validate(&self) -> Result<(), CommonError> {
        if !(self.bridge_url.starts_with("http://") || self.bridge_url.starts_with("https://")) {
            return Err(CommonError::Config(format!(
                "bridge URL must start with http:// or https://: {}",
                self.bridge_url
            )));
        }
        Ok(())
    }

    /// Address the sidecar binds to. Always loopback.
    pub fn bind_addr(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }
}

fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
