//! Settings HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::SettingsView;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::form::{FormInput, JsonFormUi, RenderedForm};
use crate::infrastructure::http::state::AppState;

/// 设置快照
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<ApiResponse<SettingsView>> {
    let view = state.backend.lock().await.settings_view();
    Json(ApiResponse::success(view))
}

/// 绘制一帧设置表单
pub async fn get_form(State(state): State<Arc<AppState>>) -> Json<ApiResponse<RenderedForm>> {
    let mut ui = JsonFormUi::new(None);
    state.backend.lock().await.render_settings(&mut ui).await;
    Json(ApiResponse::success(ui.finish()))
}

/// 带一次交互绘制一帧设置表单，返回交互之后的表单
pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    Json(input): Json<FormInput>,
) -> Result<Json<ApiResponse<RenderedForm>>, ApiError> {
    let widget = input.widget.clone();
    let mut backend = state.backend.lock().await;

    let mut ui = JsonFormUi::new(Some(input));
    backend.render_settings(&mut ui).await;
    if !ui.finish().applied {
        return Err(ApiError::BadRequest(format!("Unknown widget: {}", widget)));
    }

    // 再绘制一帧，让表单反映修改后的状态
    let mut ui = JsonFormUi::new(None);
    backend.render_settings(&mut ui).await;
    Ok(Json(ApiResponse::success(ui.finish())))
}
