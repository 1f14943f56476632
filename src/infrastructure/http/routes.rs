//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping              GET   健康检查
//! - /api/speech/say        POST  朗读文本（异步，通过 WS 通知完成）
//! - /api/speech/cancel     POST  停止朗读
//! - /api/settings          GET   设置快照
//! - /api/settings/form     GET   绘制设置表单
//! - /api/settings/form     POST  带交互绘制设置表单
//! - /ws/events             WS    全局 WebSocket（语音与设置事件）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::global_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/speech", speech_routes())
        .nest("/settings", settings_routes())
}

/// Speech 路由
fn speech_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/say", post(handlers::say))
        .route("/cancel", post(handlers::cancel))
}

/// Settings 路由
fn settings_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::get_settings))
        .route("/form", get(handlers::get_form).post(handlers::submit_form))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use super::*;
    use crate::application::backend::test_support::{configured, unconfigured};
    use crate::domain::PollySettings;
    use crate::infrastructure::http::server::build_router;

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> Value {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ping_reports_configuration() {
        let (backend, fixture) = unconfigured().await;
        let app = build_router(Arc::new(AppState::new(backend, fixture.publisher.clone())));

        let body = call(app, "GET", "/api/ping", None).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["configured"], false);
    }

    #[tokio::test]
    async fn test_say_without_credentials_returns_errno() {
        let (backend, fixture) = unconfigured().await;
        let app = build_router(Arc::new(AppState::new(backend, fixture.publisher.clone())));

        let body = call(
            app,
            "POST",
            "/api/speech/say",
            Some(json!({ "gender": "female", "text": "hello" })),
        )
        .await;
        assert_eq!(body["errno"], 412);
    }

    #[tokio::test]
    async fn test_say_and_cancel() {
        let (backend, fixture) = configured(PollySettings::default()).await;
        let app = build_router(Arc::new(AppState::new(backend, fixture.publisher.clone())));

        let body = call(
            app.clone(),
            "POST",
            "/api/speech/say",
            Some(json!({ "text": "hello" })),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert!(body["data"]["request_id"].is_string());

        let body = call(app, "POST", "/api/speech/cancel", None).await;
        assert_eq!(body["errno"], 0);
    }

    #[tokio::test]
    async fn test_settings_form_round_trip() {
        let (backend, fixture) = configured(PollySettings::default()).await;
        let app = build_router(Arc::new(AppState::new(backend, fixture.publisher.clone())));

        let body = call(
            app.clone(),
            "POST",
            "/api/settings/form",
            Some(json!({ "widget": "engine", "select": 1 })),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(fixture.settings_store.save_count(), 1);

        let body = call(app, "GET", "/api/settings", None).await;
        assert_eq!(body["data"]["settings"]["engine"], "standard");
        assert_eq!(body["data"]["voices"][0]["id"], "Hans");
        assert_eq!(body["data"]["warnings"]["voice"]["voice_id"], "Matthew");
    }

    #[tokio::test]
    async fn test_settings_form_rejects_unknown_widget() {
        let (backend, fixture) = configured(PollySettings::default()).await;
        let app = build_router(Arc::new(AppState::new(backend, fixture.publisher.clone())));

        let body = call(
            app,
            "POST",
            "/api/settings/form",
            Some(json!({ "widget": "volume", "select": 3 })),
        )
        .await;
        assert_eq!(body["errno"], 400);
    }
}
