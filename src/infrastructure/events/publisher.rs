//! Event Publisher Implementation
//!
//! 后端事件广播：语音任务结果、音色列表刷新、凭据与配置保存、错误通知

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::{Engine, Gender};

/// 后端事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum BackendEvent {
    /// 开始合成
    SpeechStarted {
        request_id: Uuid,
        voice_id: String,
        gender: Gender,
    },
    /// 合成并交给播放组件
    SpeechCompleted {
        request_id: Uuid,
        voice_id: String,
        audio_bytes: usize,
    },
    /// 被取消
    SpeechCancelled { request_id: Uuid },
    /// 合成失败
    SpeechFailed { request_id: Uuid, error: String },
    /// 音色列表已刷新
    VoicesReloaded { engine: Engine, count: usize },
    /// 客户端已（重新）连接
    ClientConnected { region: String },
    /// 凭据已保存
    CredentialsSaved,
    /// 其他可恢复错误
    OperationFailed {
        operation: String,
        error: String,
        at: DateTime<Utc>,
    },
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<BackendEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅事件
    pub fn subscribe(&self) -> broadcast::Receiver<BackendEvent> {
        self.channel.subscribe()
    }

    pub fn publish_speech_started(&self, request_id: Uuid, voice_id: &str, gender: Gender) {
        self.publish(BackendEvent::SpeechStarted {
            request_id,
            voice_id: voice_id.to_string(),
            gender,
        });
    }

    pub fn publish_speech_completed(&self, request_id: Uuid, voice_id: &str, audio_bytes: usize) {
        self.publish(BackendEvent::SpeechCompleted {
            request_id,
            voice_id: voice_id.to_string(),
            audio_bytes,
        });
    }

    pub fn publish_speech_cancelled(&self, request_id: Uuid) {
        self.publish(BackendEvent::SpeechCancelled { request_id });
    }

    pub fn publish_speech_failed(&self, request_id: Uuid, error: &str) {
        self.publish(BackendEvent::SpeechFailed {
            request_id,
            error: error.to_string(),
        });
    }

    pub fn publish_voices_reloaded(&self, engine: Engine, count: usize) {
        self.publish(BackendEvent::VoicesReloaded { engine, count });
    }

    pub fn publish_client_connected(&self, region: &str) {
        self.publish(BackendEvent::ClientConnected {
            region: region.to_string(),
        });
    }

    pub fn publish_credentials_saved(&self) {
        self.publish(BackendEvent::CredentialsSaved);
    }

    /// 发布可恢复错误（通知宿主）
    pub fn publish_operation_failed(&self, operation: &str, error: &str) {
        self.publish(BackendEvent::OperationFailed {
            operation: operation.to_string(),
            error: error.to_string(),
            at: Utc::now(),
        });
    }

    fn publish(&self, event: BackendEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::debug!(error = %e, "Failed to publish event (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
