//! polly-voice - Amazon Polly 语音后端
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 区域、引擎、音色列表、用户音色配置
//!
//! 应用层 (application/):
//! - Ports: 端口定义（PollyClient, SecretStore, SettingsStore, AudioSink, SettingsUi）
//! - Backend: 语音后端适配器（朗读、取消、设置表单）
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: AWS Polly 客户端、系统凭据管理器、TOML 配置文件、文件音频输出
//! - Memory: 内存凭据/配置存储
//! - Events: 后端事件广播
//! - HTTP: 控制接口 + WebSocket 事件流

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
