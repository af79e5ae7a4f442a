//! 通信プロトコル定義
//!
//! Host↔Sidecar↔Client間でやり取りするメッセージ

use serde::{Deserialize, Serialize};

/// Prefix of the stdout line the sidecar prints once it is listening
pub const PORT_ANNOUNCEMENT_PREFIX: &str = "SIDECAR_PORT:";

/// Name of the event the host publishes when the sidecar is ready
pub const SERVER_READY_EVENT: &str = "server-ready";

/// Format the stdout port announcement line, e.g. `SIDECAR_PORT:41234`
pub fn format_port_announcement(port: u16) -> String {
    format!("{PORT_ANNOUNCEMENT_PREFIX}{port}")
}

/// Parse a stdout line as a port announcement
///
/// Returns `None` for lines that do not carry the prefix and
/// `Some(Err(..))` when the prefix is present but the port is malformed.
pub fn parse_port_announcement(line: &str) -> Option<Result<u16, std::num::ParseIntError>> {
    line.trim()
        .strip_prefix(PORT_ANNOUNCEMENT_PREFIX)
        .map(|port| port.trim().parse::<u16>())
}

/// Sidecarの稼働状況（ホストのステータス照会の応答）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ServerStatus {
    /// Sidecarが起動済みで到達可能か
    pub running: bool,
    /// 待ち受けポート（起動済みの場合）
    #[serde(default)]
    pub port: Option<u16>,
}

/// `server-ready` イベントのペイロード
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerReady {
    /// Sidecarの待ち受けポート
    pub port: u16,
}

/// GET /health のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// 常に "ok"
    pub status: String,
}

impl HealthResponse {
    /// Healthy response body
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// GET / のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RootResponse {
    /// 常に "ok"
    pub status: String,
    /// サーバー名
    pub server: String,
}

/// GET /ai/status のレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiStatus {
    /// AI機能が利用可能か
    pub available: bool,
    /// 状態メッセージ
    pub message: String,
}

/// GET /api-key/{service} のレスポンス（ブリッジ）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKeyResponse {
    /// APIキー
    pub key: String,
}

/// APIキーサービスの一覧エントリ（キーの値は含まない）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKeyEntry {
    /// Machine-readable service identifier (e.g. "openai")
    pub service: String,
    /// Human-readable display name (e.g. "OpenAI")
    pub display_name: String,
    /// Whether a key is currently stored
    pub has_key: bool,
}

/// エラーレスポンス
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// 外部向けエラーメッセージ
    pub error: String,
}
