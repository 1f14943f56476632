//! Polly Voice - Amazon Polly 语音后端
//!
//! 分层结构:
//! - Domain: voice/（区域、引擎、音色列表、用户配置）
//! - Application: ports, backend
//! - Infrastructure: http, memory, adapters, events

use std::sync::Arc;

use polly_voice::application::{BackendPorts, PollyBackend};
use polly_voice::config::{load_config, print_config, AppConfig};
use polly_voice::infrastructure::adapters::{
    AwsPollyClientFactory, FileAudioSink, KeyringSecretStore, TomlSettingsStore,
};
use polly_voice::infrastructure::events::{BackendEvent, EventPublisher};
use polly_voice::infrastructure::http::{AppState, HttpServer, ServerConfig};
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 设置文件 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Polly Voice - Amazon Polly 语音后端");
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.speech.output_dir).await?;
    if let Some(parent) = config.storage.settings_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 创建适配器
    let audio_sink = Arc::new(FileAudioSink::with_retention(
        &config.speech.output_dir,
        config.speech.keep_files,
    ));
    let stale = audio_sink.clear_stale().await?;
    if stale > 0 {
        tracing::info!(removed = stale, "Removed speech audio from previous run");
    }
    let client_factory = Arc::new(AwsPollyClientFactory::new(audio_sink));
    let secret_store = Arc::new(KeyringSecretStore::new());
    let settings_store = Arc::new(TomlSettingsStore::new(&config.storage.settings_path));

    // 创建事件发布器
    let event_publisher = EventPublisher::new().arc();
    tokio::spawn(log_events(event_publisher.clone()));

    // 创建后端（有已保存的凭据时会连接并拉取音色列表）
    let ports = BackendPorts {
        client_factory,
        secret_store,
        settings_store,
        event_publisher: event_publisher.clone(),
    };
    let backend = PollyBackend::new(ports, config.polly.clone(), config.backend_options()).await;
    if !backend.has_client() {
        tracing::warn!("Polly client not configured, save credentials from the settings form");
    }

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(backend, event_publisher);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// 初始化日志
fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},polly_voice={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// 把后端事件写入日志
async fn log_events(publisher: Arc<EventPublisher>) {
    let mut rx = publisher.subscribe();
    loop {
        match rx.recv().await {
            Ok(BackendEvent::OperationFailed { operation, error, .. }) => {
                tracing::warn!(operation = %operation, error = %error, "Backend operation failed");
            }
            Ok(event) => tracing::debug!(event = ?event, "Backend event"),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Event log lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
