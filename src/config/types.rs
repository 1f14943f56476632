//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::{BackendOptions, CREDENTIALS_TARGET};
use crate::domain::PollySettings;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// Polly 用户配置（设置表单修改的部分）
    #[serde(default)]
    pub polly: PollySettings,

    /// 凭据配置
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// 语音派发配置
    #[serde(default)]
    pub speech: SpeechConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 后端选项
    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            credentials_target: self.credentials.target.clone(),
            interrupt_previous: self.speech.interrupt_previous,
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 凭据配置
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    /// 系统凭据管理器中的查找名
    #[serde(default = "default_credentials_target")]
    pub target: String,
}

fn default_credentials_target() -> String {
    CREDENTIALS_TARGET.to_string()
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            target: default_credentials_target(),
        }
    }
}

/// 语音派发配置
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    /// 新请求是否打断进行中的请求
    #[serde(default = "default_interrupt_previous")]
    pub interrupt_previous: bool,

    /// 合成音频输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 输出目录中保留的语音文件数
    #[serde(default = "default_keep_files")]
    pub keep_files: usize,
}

fn default_interrupt_previous() -> bool {
    true
}

fn default_keep_files() -> usize {
    32
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data/speech")
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            interrupt_previous: default_interrupt_previous(),
            output_dir: default_output_dir(),
            keep_files: default_keep_files(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 设置表单保存的配置文件
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("data/settings.toml")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
