//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::ApplicationError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const PRECONDITION_FAILED: i32 = 412;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// 后端尚未配置凭据
    NotConfigured(String),
    Internal(String),
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let response = match &self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = errno::BAD_REQUEST, error = %msg, "Bad request");
                ErrorResponse::new(errno::BAD_REQUEST, msg.clone())
            }
            ApiError::NotConfigured(msg) => {
                tracing::warn!(errno = errno::PRECONDITION_FAILED, error = %msg, "Backend not configured");
                ErrorResponse::new(errno::PRECONDITION_FAILED, msg.clone())
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = errno::INTERNAL_ERROR, error = %msg, "Internal server error");
                ErrorResponse::new(errno::INTERNAL_ERROR, msg.clone())
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(errno = errno::SERVICE_UNAVAILABLE, error = %msg, "Service unavailable");
                ErrorResponse::new(errno::SERVICE_UNAVAILABLE, msg.clone())
            }
        };

        // 业务错误统一返回 200，错误码放在 errno 中
        (StatusCode::OK, Json(response)).into_response()
    }
}

impl From<ApplicationError> for ApiError {
    fn from(e: ApplicationError) -> Self {
        match e {
            ApplicationError::NotConfigured => ApiError::NotConfigured(e.to_string()),
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::ExternalServiceError(msg) => ApiError::ServiceUnavailable(msg),
            ApplicationError::SecretStoreError(msg)
            | ApplicationError::SettingsStoreError(msg) => ApiError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_mapping() {
        assert!(matches!(
            ApiError::from(ApplicationError::NotConfigured),
            ApiError::NotConfigured(_)
        ));
        assert!(matches!(
            ApiError::from(ApplicationError::validation("bad voice")),
            ApiError::BadRequest(msg) if msg == "bad voice"
        ));
        assert!(matches!(
            ApiError::from(ApplicationError::ExternalServiceError("down".to_string())),
            ApiError::ServiceUnavailable(_)
        ));
    }
}
