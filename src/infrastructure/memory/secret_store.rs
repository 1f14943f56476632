//! In-Memory Secret Store Implementation

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::application::ports::{AccessKeys, SecretStoreError, SecretStorePort};

/// 内存凭据存储
pub struct InMemorySecretStore {
    entries: DashMap<String, AccessKeys>,
    saves: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            saves: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// 预置一组凭据
    pub fn with_keys(target: &str, keys: AccessKeys) -> Self {
        let store = Self::new();
        store.entries.insert(target.to_string(), keys);
        store
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 调用 save 的次数
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// 模拟凭据管理器不可用：之后的 load/save 返回 `Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), SecretStoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(SecretStoreError::Unavailable("in-memory store disabled".to_string()))
        } else {
            Ok(())
        }
    }

    pub fn stored(&self, target: &str) -> Option<AccessKeys> {
        self.entries.get(target).map(|e| e.clone())
    }
}

impl Default for InMemorySecretStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStorePort for InMemorySecretStore {
    fn load(&self, target: &str) -> Result<Option<AccessKeys>, SecretStoreError> {
        self.ensure_available()?;
        Ok(self.stored(target))
    }

    fn save(&self, target: &str, keys: &AccessKeys) -> Result<(), SecretStoreError> {
        self.ensure_available()?;
        self.entries.insert(target.to_string(), keys.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(target_name = %target, "Credentials stored in memory");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_overwrites_single_pair() {
        let store = InMemorySecretStore::new();
        assert!(store.load("target").unwrap().is_none());

        store.save("target", &AccessKeys::new("AK1", "SK1")).unwrap();
        store.save("target", &AccessKeys::new("AK2", "SK2")).unwrap();

        let keys = store.load("target").unwrap().unwrap();
        assert_eq!(keys.access_key(), "AK2");
        assert_eq!(keys.secret_key(), "SK2");
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn test_unavailable_store_rejects_access() {
        let store = InMemorySecretStore::with_keys("target", AccessKeys::new("AK", "SK"));
        store.set_unavailable(true);

        assert!(matches!(
            store.load("target"),
            Err(SecretStoreError::Unavailable(_))
        ));
        assert!(store.save("target", &AccessKeys::new("AK2", "SK2")).is_err());
        assert_eq!(store.save_count(), 0);

        store.set_unavailable(false);
        assert_eq!(store.load("target").unwrap().unwrap().access_key(), "AK");
    }
}
