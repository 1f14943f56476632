//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

use super::VoiceError;

/// 找不到配置音色时使用的内置音色
pub const DEFAULT_VOICE_ID: &str = "Matthew";

/// 默认区域
pub const DEFAULT_REGION: &str = "eu-west-1";

/// 区域选择器提供的全部区域（系统名称）
pub const REGIONS: &[&str] = &[
    "af-south-1",
    "ap-east-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-south-1",
    "ap-south-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ca-central-1",
    "cn-north-1",
    "cn-northwest-1",
    "eu-central-1",
    "eu-central-2",
    "eu-north-1",
    "eu-south-1",
    "eu-south-2",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "il-central-1",
    "me-central-1",
    "me-south-1",
    "sa-east-1",
    "us-east-1",
    "us-east-2",
    "us-gov-east-1",
    "us-gov-west-1",
    "us-west-1",
    "us-west-2",
];

/// 区域是否在可选列表中
pub fn is_known_region(region: &str) -> bool {
    REGIONS.contains(&region)
}

/// 语音请求的性别标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unspecified => "unspecified",
        }
    }
}

/// 合成引擎
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Neural,
    Standard,
}

impl Engine {
    /// 引擎选择器的选项顺序
    pub const ALL: [Engine; 2] = [Engine::Neural, Engine::Standard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Neural => "neural",
            Engine::Standard => "standard",
        }
    }

    /// 在 `ALL` 中的位置
    pub fn index(&self) -> usize {
        match self {
            Engine::Neural => 0,
            Engine::Standard => 1,
        }
    }
}

impl std::str::FromStr for Engine {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "neural" => Ok(Engine::Neural),
            "standard" => Ok(Engine::Standard),
            other => Err(VoiceError::UnknownEngine(other.to_string())),
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 服务端返回的一个音色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceEntry {
    /// 音色标识（传给 synthesize 的值）
    pub id: String,
    /// 显示名称
    pub name: String,
}

impl VoiceEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
