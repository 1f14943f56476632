//! Settings Adapter - 用户配置文件

mod toml_store;

pub use toml_store::TomlSettingsStore;
