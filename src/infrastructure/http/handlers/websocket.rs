//! WebSocket Handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

use crate::infrastructure::http::state::AppState;

/// 全局 WebSocket 连接处理（语音与设置事件）
pub async fn global_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_global_socket(socket, state))
}

async fn handle_global_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    let mut event_rx = state.event_publisher.subscribe();

    tracing::info!("Global WebSocket connected");

    // 事件转发任务
    let forward_task = tokio::spawn(async move {
        loop {
            let event = match event_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "WebSocket subscriber lagged, events dropped");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };

            let msg = match serde_json::to_string(&event) {
                Ok(json) => Message::Text(json),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize event");
                    continue;
                }
            };

            if let Err(e) = sender.send(msg).await {
                tracing::debug!(error = %e, "Failed to send global WebSocket message");
                break;
            }
        }
    });

    // 接收客户端消息（心跳）
    let receive_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!("Global WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Global WebSocket error");
                    break;
                }
                _ => {}
            }
        }
    });

    // 等待任一任务完成
    tokio::select! {
        _ = forward_task => {}
        _ = receive_task => {}
    }

    tracing::info!("Global WebSocket disconnected");
}
