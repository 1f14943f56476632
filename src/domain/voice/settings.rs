//! Voice Context - 用户音色配置

use serde::{Deserialize, Serialize};

use super::{Engine, Gender, DEFAULT_REGION, DEFAULT_VOICE_ID};

/// Polly 用户配置
///
/// 由设置表单逐字段修改，每次修改后立即保存
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollySettings {
    /// 区域（系统名称，例如 eu-west-1）
    #[serde(default = "default_region")]
    pub region: String,

    /// 合成引擎
    #[serde(default)]
    pub engine: Engine,

    /// 默认音色
    #[serde(default = "default_voice")]
    pub voice: String,

    /// 男性预设音色
    #[serde(default = "default_voice")]
    pub voice_male: String,

    /// 女性预设音色
    #[serde(default = "default_voice")]
    pub voice_female: String,

    /// 是否启用性别预设
    #[serde(default)]
    pub use_gendered_voice_presets: bool,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_voice() -> String {
    DEFAULT_VOICE_ID.to_string()
}

impl Default for PollySettings {
    fn default() -> Self {
        Self {
            region: default_region(),
            engine: Engine::default(),
            voice: default_voice(),
            voice_male: default_voice(),
            voice_female: default_voice(),
            use_gendered_voice_presets: false,
        }
    }
}

impl PollySettings {
    /// 根据性别标签选择配置的音色标识
    ///
    /// 未启用性别预设时总是返回默认音色
    pub fn voice_for(&self, gender: Gender) -> &str {
        if !self.use_gendered_voice_presets {
            return &self.voice;
        }
        match gender {
            Gender::Male => &self.voice_male,
            Gender::Female => &self.voice_female,
            Gender::Unspecified => &self.voice,
        }
    }
}
