//! Backend - 语音后端适配器
//!
//! - polly_backend: 客户端生命周期、朗读、取消
//! - settings_form: 设置表单与逐项持久化

mod polly_backend;
mod settings_form;

pub use polly_backend::{BackendOptions, BackendPorts, PollyBackend, CREDENTIALS_TARGET};
pub use settings_form::{SettingsEdit, SettingsView, VoiceSlot, VoiceWarnings};

#[cfg(test)]
pub(crate) mod test_support;
