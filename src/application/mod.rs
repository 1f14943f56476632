//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Polly 客户端、凭据存储、配置存储、音频播放、设置表单）
//! - backend: 语音后端适配器
//! - error: 应用层错误定义

pub mod backend;
pub mod error;
pub mod ports;

// Re-exports
pub use backend::{
    BackendOptions, BackendPorts, PollyBackend, SettingsEdit, SettingsView, VoiceSlot,
    VoiceWarnings, CREDENTIALS_TARGET,
};

pub use error::ApplicationError;

pub use ports::{
    // Polly client
    PollyClientFactory,
    PollyClientPort,
    SpeechAudio,
    SynthesisRequest,
    TtsError,
    // Secret store
    AccessKeys,
    SecretStoreError,
    SecretStorePort,
    // Settings store
    SettingsStoreError,
    SettingsStorePort,
    // Playback
    AudioSinkPort,
    // Settings UI
    SettingsUi,
};
