//! Settings Store Port - 用户配置持久化

use thiserror::Error;

use crate::domain::PollySettings;

#[derive(Debug, Error)]
pub enum SettingsStoreError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializeError(String),
}

/// Settings Store Port
///
/// `save` 同步且幂等
pub trait SettingsStorePort: Send + Sync {
    fn save(&self, settings: &PollySettings) -> Result<(), SettingsStoreError>;
}
