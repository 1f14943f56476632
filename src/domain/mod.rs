//! Domain Layer - 领域层
//!
//! 只有一个限界上下文:
//! - Voice Context: Polly 区域、引擎、音色列表与用户音色配置

pub mod voice;

pub use voice::{
    is_known_region, validate_voice, Engine, Gender, PollySettings, VoiceCatalog, VoiceEntry,
    VoiceError, VoiceWarning, DEFAULT_REGION, DEFAULT_VOICE_ID, REGIONS,
};
