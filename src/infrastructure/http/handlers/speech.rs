//! Speech HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{ApiResponse, Empty, SayRequest, SayResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 朗读文本
///
/// 立即返回请求 ID，结果通过 /ws/events 推送
pub async fn say(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SayRequest>,
) -> Result<Json<ApiResponse<SayResponse>>, ApiError> {
    let request_id = state.backend.lock().await.speak(req.gender, req.text)?;
    Ok(Json(ApiResponse::success(SayResponse { request_id })))
}

/// 停止朗读
pub async fn cancel(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Empty>> {
    state.backend.lock().await.cancel_say().await;
    Json(ApiResponse::ok())
}
