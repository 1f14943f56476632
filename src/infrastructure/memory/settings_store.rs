//! In-Memory Settings Store Implementation

use std::sync::{Arc, Mutex, PoisonError};

use crate::application::ports::{SettingsStoreError, SettingsStorePort};
use crate::domain::PollySettings;

/// 内存配置存储，记录每一次保存
#[derive(Default)]
pub struct InMemorySettingsStore {
    history: Mutex<Vec<PollySettings>>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn save_count(&self) -> usize {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// 最近一次保存的配置
    pub fn last(&self) -> Option<PollySettings> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl SettingsStorePort for InMemorySettingsStore {
    fn save(&self, settings: &PollySettings) -> Result<(), SettingsStoreError> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(settings.clone());
        Ok(())
    }
}
