//! HTTP Middleware
//!
//! 按状态码和耗时给每个请求归类，只记录需要关注的请求。
//! 业务错误（errno != 0）由 ApiError::into_response() 记录

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use std::time::{Duration, Instant};

/// 超过该耗时的请求记为慢请求（Polly 往返通常远低于此）
pub const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(2);

/// 请求归类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Normal,
    Slow,
    ClientError,
    ServerError,
}

/// 状态码优先于耗时
pub fn classify(status: StatusCode, elapsed: Duration) -> RequestOutcome {
    if status.is_server_error() {
        RequestOutcome::ServerError
    } else if status.is_client_error() {
        RequestOutcome::ClientError
    } else if elapsed >= SLOW_REQUEST_THRESHOLD {
        RequestOutcome::Slow
    } else {
        RequestOutcome::Normal
    }
}

/// 请求日志中间件
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed = started.elapsed();
    let status = response.status().as_u16();
    let elapsed_ms = elapsed.as_millis() as u64;

    match classify(response.status(), elapsed) {
        RequestOutcome::ServerError => {
            tracing::error!(%method, %path, status, elapsed_ms, "HTTP server error");
        }
        RequestOutcome::ClientError => {
            tracing::warn!(%method, %path, status, elapsed_ms, "HTTP client error");
        }
        RequestOutcome::Slow => {
            tracing::warn!(%method, %path, status, elapsed_ms, "Slow HTTP request");
        }
        RequestOutcome::Normal => {
            tracing::trace!(%method, %path, status, elapsed_ms, "HTTP request");
        }
    }

    response
}
