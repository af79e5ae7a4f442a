//! AI APIハンドラー
//!
//! LLMルートは未実装。ステータスのみ返す。

use crate::AppState;
use axum::{routing::get, Json, Router};
use portlink_common::protocol::AiStatus;

/// `/ai` 配下のルーター
pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(status))
}

/// GET /ai/status
pub async fn status() -> Json<AiStatus> {
    Json(AiStatus {
        available: false,
        message: "AI routes not yet implemented".to_string(),
    })
}
