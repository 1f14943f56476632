//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 设置表单保存的配置文件（storage.settings_path）
//! 3. 配置文件（config.toml）
//! 4. 默认值

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::domain::is_known_region;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "POLLY_VOICE";

/// 加载应用配置
///
/// # 环境变量示例
/// - `POLLY_VOICE_SERVER__PORT=8080`
/// - `POLLY_VOICE_POLLY__REGION=us-east-1`
/// - `POLLY_VOICE_POLLY__ENGINE=standard`
/// - `POLLY_VOICE_SPEECH__INTERRUPT_PREVIOUS=false`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    // 第一遍只为了确定设置文件的位置
    let first_pass = base_builder(config_path)?
        .add_source(environment())
        .build()?;
    let settings_path = first_pass.get_string("storage.settings_path")?;

    let config = base_builder(config_path)?
        .add_source(File::from(Path::new(&settings_path)).required(false))
        .add_source(environment())
        .build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 默认值 + 配置文件
fn base_builder(
    config_path: Option<&Path>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 5070)?
        .set_default("polly.region", "eu-west-1")?
        .set_default("polly.engine", "neural")?
        .set_default("polly.voice", "Matthew")?
        .set_default("polly.voice_male", "Matthew")?
        .set_default("polly.voice_female", "Matthew")?
        .set_default("polly.use_gendered_voice_presets", false)?
        .set_default("credentials.target", "TextToTalk_AccessKeys_AmazonPolly")?
        .set_default("speech.interrupt_previous", true)?
        .set_default("speech.output_dir", "data/speech")?
        .set_default("speech.keep_files", 32)?
        .set_default("storage.settings_path", "data/settings.toml")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    Ok(builder)
}

/// 前缀 POLLY_VOICE_，层级分隔符 __
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if !is_known_region(&config.polly.region) {
        return Err(ConfigError::ValidationError(format!(
            "Unknown Polly region: {}",
            config.polly.region
        )));
    }

    if config.credentials.target.is_empty() {
        return Err(ConfigError::ValidationError(
            "Credentials target cannot be empty".to_string(),
        ));
    }

    if config.speech.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Speech output directory cannot be empty".to_string(),
        ));
    }

    if config.speech.keep_files == 0 {
        return Err(ConfigError::ValidationError(
            "speech.keep_files must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Polly Region: {}", config.polly.region);
    tracing::info!("Polly Engine: {}", config.polly.engine);
    tracing::info!("Default Voice: {}", config.polly.voice);
    tracing::info!(
        "Gendered Voices: {} (male: {}, female: {})",
        config.polly.use_gendered_voice_presets,
        config.polly.voice_male,
        config.polly.voice_female
    );
    tracing::info!("Credentials Target: {}", config.credentials.target);
    tracing::info!("Interrupt Previous Speech: {}", config.speech.interrupt_previous);
    tracing::info!(
        "Speech Output: {:?} (keep {} files)",
        config.speech.output_dir,
        config.speech.keep_files
    );
    tracing::info!("Settings File: {:?}", config.storage.settings_path);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Engine;
    use tempfile::TempDir;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_unknown_region() {
        let mut config = AppConfig::default();
        config.polly.region = "mars-north-1".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_keep_files() {
        let mut config = AppConfig::default();
        config.speech.keep_files = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_target() {
        let mut config = AppConfig::default();
        config.credentials.target = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_settings_file_overrides_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.toml");
        let config_path = temp_dir.path().join("config.toml");

        std::fs::write(
            &config_path,
            format!(
                "[server]\nport = 8080\n\n[polly]\nvoice = \"Joanna\"\n\n[storage]\nsettings_path = {:?}\n",
                settings_path.to_string_lossy()
            ),
        )
        .unwrap();
        std::fs::write(
            &settings_path,
            "[polly]\nengine = \"standard\"\nvoice = \"Joey\"\n",
        )
        .unwrap();

        let config = load_config_from_path(Some(&config_path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.polly.engine, Engine::Standard);
        assert_eq!(config.polly.voice, "Joey");
        assert_eq!(config.polly.region, "eu-west-1");
    }

    #[test]
    fn test_missing_settings_file_is_optional() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            format!(
                "[storage]\nsettings_path = {:?}\n",
                temp_dir.path().join("absent.toml").to_string_lossy()
            ),
        )
        .unwrap();

        let config = load_config_from_path(Some(&config_path)).unwrap();
        assert_eq!(config.polly.voice, "Matthew");
    }
}
