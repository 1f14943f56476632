//! Audio Sink Port - 音频播放组件抽象

use async_trait::async_trait;

use crate::application::ports::{SpeechAudio, TtsError};

/// Audio Sink Port
///
/// 接收合成好的音频并负责播放
#[async_trait]
pub trait AudioSinkPort: Send + Sync {
    async fn play(&self, audio: &SpeechAudio) -> Result<(), TtsError>;

    /// 停止当前播放，空闲时为 no-op
    async fn stop(&self) -> Result<(), TtsError>;
}
