//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 区域 / 引擎枚举
//! - 当前引擎的音色列表（VoiceCatalog）
//! - 用户音色配置与性别预设（PollySettings）
//! - 音色校验

mod catalog;
mod errors;
mod settings;
mod value_objects;

pub use catalog::{validate_voice, VoiceCatalog, VoiceWarning};
pub use errors::VoiceError;
pub use settings::PollySettings;
pub use value_objects::{
    is_known_region, Engine, Gender, VoiceEntry, DEFAULT_REGION, DEFAULT_VOICE_ID, REGIONS,
};
