//! Secret Store Port - 凭据存储抽象
//!
//! 固定的查找名下只保存一组凭据

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// 凭据存储错误
#[derive(Debug, Error)]
pub enum SecretStoreError {
    #[error("Secret store unavailable: {0}")]
    Unavailable(String),

    #[error("Stored credentials are corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to write credentials: {0}")]
    WriteFailed(String),
}

/// Access key / secret key
#[derive(Clone)]
pub struct AccessKeys {
    pub access_key: SecretString,
    pub secret_key: SecretString,
}

impl AccessKeys {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: SecretString::new(access_key.into()),
            secret_key: SecretString::new(secret_key.into()),
        }
    }

    pub fn access_key(&self) -> &str {
        self.access_key.expose_secret()
    }

    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

impl std::fmt::Debug for AccessKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKeys")
            .field("access_key", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// Secret Store Port
pub trait SecretStorePort: Send + Sync {
    /// 读取凭据，不存在时返回 `Ok(None)`
    fn load(&self, target: &str) -> Result<Option<AccessKeys>, SecretStoreError>;

    /// 覆盖写入凭据
    fn save(&self, target: &str, keys: &AccessKeys) -> Result<(), SecretStoreError>;
}
