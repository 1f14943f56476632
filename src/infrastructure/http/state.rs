//! Application State
//!
//! 后端只有一个所有者：所有操作经由同一把锁串行执行

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::PollyBackend;
use crate::infrastructure::events::EventPublisher;

/// 应用状态
pub struct AppState {
    pub backend: Mutex<PollyBackend>,
    pub event_publisher: Arc<EventPublisher>,
}

impl AppState {
    /// 创建应用状态
    pub fn new(backend: PollyBackend, event_publisher: Arc<EventPublisher>) -> Self {
        Self {
            backend: Mutex::new(backend),
            event_publisher,
        }
    }
}
