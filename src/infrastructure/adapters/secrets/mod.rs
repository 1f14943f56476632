//! Secrets Adapter - 系统凭据管理器

mod keyring_store;

pub use keyring_store::KeyringSecretStore;
