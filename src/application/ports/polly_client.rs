//! Polly Client Port - 远端语音合成服务抽象
//!
//! 定义 Polly 客户端的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::AccessKeys;
use crate::domain::{Engine, VoiceEntry};

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Playback error: {0}")]
    PlaybackError(String),

    #[error("Client disposed")]
    Disposed,
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 请求 ID（用于日志和事件）
    pub request_id: Uuid,
    /// 已解析的音色标识
    pub voice_id: String,
    pub engine: Engine,
    pub text: String,
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub request_id: Uuid,
    pub voice_id: String,
    /// 编码后的音频数据（MP3）
    pub data: Vec<u8>,
}

/// Polly Client Port
///
/// 一个实例对应一个活动的客户端会话
#[async_trait]
pub trait PollyClientPort: Send + Sync {
    /// 列出某个引擎可用的音色，保持服务端顺序
    async fn list_voices(&self, engine: Engine) -> Result<Vec<VoiceEntry>, TtsError>;

    /// 合成并交给播放组件
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SpeechAudio, TtsError>;

    /// 停止当前播放
    async fn cancel(&self) -> Result<(), TtsError>;

    /// 释放底层连接资源，之后的调用返回 `TtsError::Disposed`
    fn dispose(&self);
}

/// Polly 客户端工厂
///
/// 每次 `connect` 构造一个新的客户端会话
pub trait PollyClientFactory: Send + Sync {
    fn connect(&self, keys: &AccessKeys, region: &str)
        -> Result<Arc<dyn PollyClientPort>, TtsError>;
}
