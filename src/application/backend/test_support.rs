//! 后端测试夹具：fake Polly 客户端 + 内存存储

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::application::ports::AccessKeys;
use crate::domain::PollySettings;
use crate::infrastructure::adapters::{FakeCallLog, FakePollyClientConfig, FakePollyClientFactory};
use crate::infrastructure::events::{BackendEvent, EventPublisher};
use crate::infrastructure::memory::{InMemorySecretStore, InMemorySettingsStore};

use super::{BackendOptions, BackendPorts, PollyBackend, CREDENTIALS_TARGET};

pub(crate) const ACCESS_KEY: &str = "AKIDEXAMPLE";
pub(crate) const SECRET_KEY: &str = "wJalrXUtnFEMIK7MDENGbPxRfiCYEXAMPLEKEY";

pub(crate) struct Fixture {
    pub factory: Arc<FakePollyClientFactory>,
    pub log: Arc<FakeCallLog>,
    pub secrets: Arc<InMemorySecretStore>,
    pub settings_store: Arc<InMemorySettingsStore>,
    pub publisher: Arc<EventPublisher>,
    pub events: broadcast::Receiver<BackendEvent>,
}

pub(crate) fn stored_keys() -> AccessKeys {
    AccessKeys::new(ACCESS_KEY, SECRET_KEY)
}

pub(crate) async fn build(
    config: FakePollyClientConfig,
    stored: Option<AccessKeys>,
    settings: PollySettings,
    options: BackendOptions,
) -> (PollyBackend, Fixture) {
    let factory = Arc::new(FakePollyClientFactory::new(config));
    let log = factory.log();

    let secrets = match stored {
        Some(keys) => InMemorySecretStore::with_keys(CREDENTIALS_TARGET, keys),
        None => InMemorySecretStore::new(),
    }
    .arc();
    let settings_store = InMemorySettingsStore::new().arc();
    let publisher = EventPublisher::new().arc();
    let events = publisher.subscribe();

    let ports = BackendPorts {
        client_factory: factory.clone(),
        secret_store: secrets.clone(),
        settings_store: settings_store.clone(),
        event_publisher: publisher.clone(),
    };
    let backend = PollyBackend::new(ports, settings, options).await;

    (
        backend,
        Fixture {
            factory,
            log,
            secrets,
            settings_store,
            publisher,
            events,
        },
    )
}

/// 已保存凭据、默认 fake 音色列表
pub(crate) async fn configured(settings: PollySettings) -> (PollyBackend, Fixture) {
    build(
        FakePollyClientConfig::default(),
        Some(stored_keys()),
        settings,
        BackendOptions::default(),
    )
    .await
}

/// 没有保存凭据
pub(crate) async fn unconfigured() -> (PollyBackend, Fixture) {
    build(
        FakePollyClientConfig::default(),
        None,
        PollySettings::default(),
        BackendOptions::default(),
    )
    .await
}

/// 取出当前已发布的事件
pub(crate) fn drain(events: &mut broadcast::Receiver<BackendEvent>) -> Vec<BackendEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

/// 等待某个请求的结束事件（完成、取消或失败）
pub(crate) async fn outcome(
    events: &mut broadcast::Receiver<BackendEvent>,
    request_id: Uuid,
) -> BackendEvent {
    let wait = async {
        loop {
            let event = events.recv().await.expect("event channel closed");
            let id = match &event {
                BackendEvent::SpeechCompleted { request_id, .. }
                | BackendEvent::SpeechCancelled { request_id }
                | BackendEvent::SpeechFailed { request_id, .. } => *request_id,
                _ => continue,
            };
            if id == request_id {
                return event;
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("timed out waiting for speech outcome")
}
