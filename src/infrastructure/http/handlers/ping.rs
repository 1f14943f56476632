//! Ping Handler
//!
//! 健康检查，同时报告后端是否已配置凭据

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::http::state::AppState;

/// Ping 响应
#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Polly 客户端是否存在
    pub configured: bool,
}

/// Ping endpoint - 健康检查
pub async fn ping(State(state): State<Arc<AppState>>) -> Json<PingResponse> {
    let configured = state.backend.lock().await.has_client();
    Json(PingResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        configured,
    })
}
