//! Keyring Secret Store - 系统凭据管理器
//!
//! 实现 SecretStorePort：凭据以 JSON 保存在 `(target, "access_keys")` 条目下
//! （Windows Credential Manager / macOS Keychain / Secret Service）

use keyring::Entry;
use serde::{Deserialize, Serialize};

use crate::application::ports::{AccessKeys, SecretStoreError, SecretStorePort};

/// 条目的用户名部分
const KEYRING_USER: &str = "access_keys";

#[derive(Serialize, Deserialize)]
struct StoredKeys {
    access_key: String,
    secret_key: String,
}

/// 系统凭据管理器存储
#[derive(Debug, Default)]
pub struct KeyringSecretStore;

impl KeyringSecretStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(target: &str) -> Result<Entry, SecretStoreError> {
        Entry::new(target, KEYRING_USER).map_err(|e| SecretStoreError::Unavailable(e.to_string()))
    }
}

impl SecretStorePort for KeyringSecretStore {
    fn load(&self, target: &str) -> Result<Option<AccessKeys>, SecretStoreError> {
        let entry = Self::entry(target)?;

        let json = match entry.get_password() {
            Ok(json) => json,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => return Err(SecretStoreError::Unavailable(e.to_string())),
        };

        let stored: StoredKeys =
            serde_json::from_str(&json).map_err(|e| SecretStoreError::Corrupt(e.to_string()))?;

        tracing::debug!(target_name = %target, "Credentials loaded from keyring");
        Ok(Some(AccessKeys::new(stored.access_key, stored.secret_key)))
    }

    fn save(&self, target: &str, keys: &AccessKeys) -> Result<(), SecretStoreError> {
        let entry = Self::entry(target)?;

        let json = serde_json::to_string(&StoredKeys {
            access_key: keys.access_key().to_string(),
            secret_key: keys.secret_key().to_string(),
        })
        .map_err(|e| SecretStoreError::WriteFailed(e.to_string()))?;

        entry
            .set_password(&json)
            .map_err(|e| SecretStoreError::WriteFailed(e.to_string()))?;

        tracing::debug!(target_name = %target, "Credentials written to keyring");
        Ok(())
    }
}
