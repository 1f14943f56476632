//! 应用层错误定义
//!
//! 后端适配器操作的统一错误类型

use thiserror::Error;

use crate::application::ports::{SecretStoreError, SettingsStoreError, TtsError};
use crate::domain::VoiceError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 尚未配置凭据，客户端不存在
    #[error("Polly client is not configured: save access keys first")]
    NotConfigured,

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 凭据存储错误
    #[error("Secret store error: {0}")]
    SecretStoreError(String),

    /// 配置持久化错误
    #[error("Settings store error: {0}")]
    SettingsStoreError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

impl From<TtsError> for ApplicationError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::Disposed => Self::NotConfigured,
            other => Self::ExternalServiceError(other.to_string()),
        }
    }
}

impl From<SecretStoreError> for ApplicationError {
    fn from(err: SecretStoreError) -> Self {
        Self::SecretStoreError(err.to_string())
    }
}

impl From<SettingsStoreError> for ApplicationError {
    fn from(err: SettingsStoreError) -> Self {
        Self::SettingsStoreError(err.to_string())
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        Self::ValidationError(err.to_string())
    }
}
