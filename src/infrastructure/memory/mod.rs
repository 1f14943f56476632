//! Memory Layer - In-Memory Stores
//!
//! 凭据与用户配置的内存实现，用于测试和不落盘的宿主

mod secret_store;
mod settings_store;

pub use secret_store::InMemorySecretStore;
pub use settings_store::InMemorySettingsStore;
