//! ヘルスチェックAPIハンドラー

use crate::AppState;
use axum::{routing::get, Json, Router};
use portlink_common::protocol::{HealthResponse, RootResponse};

/// Server name reported by `GET /`
pub const SERVER_NAME: &str = "portlink-sidecar";

/// `/health` 配下のルーター
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// GET / - ルートヘルスチェック
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        status: "ok".to_string(),
        server: SERVER_NAME.to_string(),
    })
}
