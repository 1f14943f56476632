//! TOML Settings Store - 用户配置文件
//!
//! 实现 SettingsStorePort：把 `[polly]` 表写入配置文件，启动时由 loader 读回

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::application::ports::{SettingsStoreError, SettingsStorePort};
use crate::domain::PollySettings;

#[derive(Serialize)]
struct SettingsFile<'a> {
    polly: &'a PollySettings,
}

/// TOML 文件配置存储
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStorePort for TomlSettingsStore {
    fn save(&self, settings: &PollySettings) -> Result<(), SettingsStoreError> {
        let content = toml::to_string_pretty(&SettingsFile { polly: settings })
            .map_err(|e| SettingsStoreError::SerializeError(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SettingsStoreError::IoError(e.to_string()))?;
        }

        // 先写临时文件再替换，避免写到一半的文件
        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, content).map_err(|e| SettingsStoreError::IoError(e.to_string()))?;
        fs::rename(&tmp_path, &self.path)
            .map_err(|e| SettingsStoreError::IoError(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), "Settings file written");
        Ok(())
    }
}
