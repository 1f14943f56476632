//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod audio_sink;
mod polly_client;
mod secret_store;
mod settings_store;
mod settings_ui;

pub use audio_sink::AudioSinkPort;
pub use polly_client::{
    PollyClientFactory, PollyClientPort, SpeechAudio, SynthesisRequest, TtsError,
};
pub use secret_store::{AccessKeys, SecretStoreError, SecretStorePort};
pub use settings_store::{SettingsStoreError, SettingsStorePort};
pub use settings_ui::SettingsUi;
