//! Polly Backend - 语音后端适配器
//!
//! 持有唯一的 Polly 客户端会话，负责：
//! - 启动时读取凭据、连接并拉取音色列表
//! - 把带性别标签的语音请求转换为音色标识并派发合成
//! - 取消正在进行的合成/播放
//! - 丢弃时释放客户端

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AccessKeys, PollyClientFactory, PollyClientPort, SecretStorePort, SettingsStorePort,
    SynthesisRequest,
};
use crate::domain::{Gender, PollySettings, VoiceCatalog};
use crate::infrastructure::events::EventPublisher;

/// 凭据在系统凭据管理器中的查找名
pub const CREDENTIALS_TARGET: &str = "TextToTalk_AccessKeys_AmazonPolly";

/// 后端依赖的端口
#[derive(Clone)]
pub struct BackendPorts {
    pub client_factory: Arc<dyn PollyClientFactory>,
    pub secret_store: Arc<dyn SecretStorePort>,
    pub settings_store: Arc<dyn SettingsStorePort>,
    pub event_publisher: Arc<EventPublisher>,
}

/// 后端选项
#[derive(Debug, Clone)]
pub struct BackendOptions {
    /// 凭据查找名
    pub credentials_target: String,
    /// 新的语音请求是否先取消进行中的请求
    pub interrupt_previous: bool,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            credentials_target: CREDENTIALS_TARGET.to_string(),
            interrupt_previous: true,
        }
    }
}

/// 进行中的语音请求
pub(super) struct InFlightSpeech {
    request_id: Uuid,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Polly 语音后端
///
/// 状态只有“客户端存在 / 不存在”两种:
/// - 不存在 -> 存在: 构造时读到凭据，或保存新凭据
/// - 存在 -> 存在: 重新保存凭据或切换区域时销毁旧客户端并重建
///
/// `client` 与 `active_keys` 总是同时存在，客户端的区域总是 `settings.region`
pub struct PollyBackend {
    pub(super) ports: BackendPorts,
    pub(super) options: BackendOptions,
    pub(super) settings: PollySettings,
    pub(super) client: Option<Arc<dyn PollyClientPort>>,
    /// 当前客户端使用的凭据
    active_keys: Option<AccessKeys>,
    pub(super) voices: VoiceCatalog,
    /// 表单中的凭据输入缓冲，只在构造时从凭据存储同步一次
    pub(super) access_key_input: String,
    pub(super) secret_key_input: String,
    pub(super) in_flight: Vec<InFlightSpeech>,
    pub(super) last_error: Option<String>,
}

impl PollyBackend {
    /// 创建后端
    ///
    /// 有已保存的凭据时会连接客户端并拉取当前引擎的音色列表；
    /// 失败不会中断构造，只记录到 `last_error` 并发布事件
    pub async fn new(ports: BackendPorts, settings: PollySettings, options: BackendOptions) -> Self {
        let mut backend = Self {
            ports,
            options,
            settings,
            client: None,
            active_keys: None,
            voices: VoiceCatalog::empty(),
            access_key_input: String::new(),
            secret_key_input: String::new(),
            in_flight: Vec::new(),
            last_error: None,
        };

        let stored = backend
            .ports
            .secret_store
            .load(&backend.options.credentials_target);

        match stored {
            Ok(Some(keys)) => {
                backend.access_key_input = keys.access_key().to_string();
                backend.secret_key_input = keys.secret_key().to_string();

                let result = match backend.connect(&keys) {
                    Ok(()) => backend.reload_voices().await.map(|_| ()),
                    Err(e) => Err(e),
                };
                if let Err(e) = result {
                    backend.report("initialize", &e);
                }
            }
            Ok(None) => {
                tracing::info!(
                    target_name = %backend.options.credentials_target,
                    "No stored Polly credentials, voice list left empty"
                );
            }
            Err(e) => backend.report("load_credentials", &e.into()),
        }

        backend
    }

    /// 朗读文本
    ///
    /// 必须在 tokio 运行时中调用。返回请求 ID，结果通过事件发布
    pub fn speak(
        &mut self,
        gender: Gender,
        text: impl Into<String>,
    ) -> Result<Uuid, ApplicationError> {
        let client = self.client.clone().ok_or(ApplicationError::NotConfigured)?;

        self.prune_finished();
        let interrupted = if self.options.interrupt_previous {
            self.cancel_in_flight()
        } else {
            0
        };

        let configured = self.settings.voice_for(gender);
        let voice_id = self.voices.resolve(configured).to_string();
        if voice_id != configured {
            tracing::debug!(
                configured = %configured,
                fallback = %voice_id,
                "Configured voice not available, using fallback"
            );
        }

        let request = SynthesisRequest {
            request_id: Uuid::new_v4(),
            voice_id,
            engine: self.settings.engine,
            text: text.into(),
        };
        let request_id = request.request_id;

        tracing::info!(
            request_id = %request_id,
            voice_id = %request.voice_id,
            gender = gender.as_str(),
            text_len = request.text.len(),
            "Dispatching speech request"
        );

        let events = self.ports.event_publisher.clone();
        events.publish_speech_started(request_id, &request.voice_id, gender);

        let token = CancellationToken::new();
        let handle = tokio::spawn(run_speech(
            client,
            request,
            interrupted > 0,
            token.clone(),
            events,
        ));

        self.in_flight.push(InFlightSpeech {
            request_id,
            token,
            handle,
        });

        Ok(request_id)
    }

    /// 停止合成与播放
    ///
    /// 空闲或没有客户端时为 no-op；失败只记录并发布，不返回错误
    pub async fn cancel_say(&mut self) {
        let cancelled = self.cancel_in_flight();

        let Some(client) = self.client.clone() else {
            return;
        };

        match client.cancel().await {
            Ok(()) => {
                tracing::debug!(cancelled = cancelled, "Speech cancelled");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to stop playback");
                self.ports
                    .event_publisher
                    .publish_operation_failed("cancel", &e.to_string());
            }
        }
    }

    /// 重新拉取当前引擎的音色列表，整体替换旧列表
    ///
    /// 没有客户端或拉取失败时清空列表
    pub async fn reload_voices(&mut self) -> Result<usize, ApplicationError> {
        let engine = self.settings.engine;

        let Some(client) = self.client.clone() else {
            self.voices.clear();
            return Err(ApplicationError::NotConfigured);
        };

        match client.list_voices(engine).await {
            Ok(entries) => {
                let count = entries.len();
                self.voices.replace(engine, entries);
                tracing::info!(engine = %engine, count = count, "Voice list reloaded");
                self.ports
                    .event_publisher
                    .publish_voices_reloaded(engine, count);
                Ok(count)
            }
            Err(e) => {
                self.voices.clear();
                Err(e.into())
            }
        }
    }

    /// 销毁旧客户端（如有）并用当前区域构造新客户端
    ///
    /// 构造失败时客户端为不存在
    pub(super) fn connect(&mut self, keys: &AccessKeys) -> Result<(), ApplicationError> {
        self.release_client();

        let region = self.settings.region.clone();
        let client = self.ports.client_factory.connect(keys, &region)?;
        self.install_client(client, keys.clone(), &region);
        Ok(())
    }

    /// 切换区域
    ///
    /// 有客户端时先用当前凭据在新区域建好客户端，成功后才替换旧客户端并提交区域；
    /// 失败时客户端和区域都保持不变
    pub(super) fn switch_region(&mut self, region: String) -> Result<(), ApplicationError> {
        if let Some(keys) = self.active_keys.clone() {
            let client = self.ports.client_factory.connect(&keys, &region)?;
            self.release_client();
            self.install_client(client, keys, &region);
        }
        self.settings.region = region;
        Ok(())
    }

    fn install_client(&mut self, client: Arc<dyn PollyClientPort>, keys: AccessKeys, region: &str) {
        self.client = Some(client);
        self.active_keys = Some(keys);

        tracing::info!(region = %region, "Polly client connected");
        self.ports.event_publisher.publish_client_connected(region);
    }

    /// 取消进行中的请求并销毁客户端
    fn release_client(&mut self) {
        self.cancel_in_flight();
        self.active_keys = None;
        if let Some(old) = self.client.take() {
            old.dispose();
            tracing::debug!("Polly client disposed");
        }
    }

    /// 记录可恢复错误：日志 + 事件 + 表单显示
    pub(super) fn report(&mut self, operation: &str, error: &ApplicationError) {
        tracing::error!(operation = operation, error = %error, "Polly backend operation failed");
        self.ports
            .event_publisher
            .publish_operation_failed(operation, &error.to_string());
        self.last_error = Some(error.to_string());
    }

    /// 取消所有进行中的请求，返回取消数量
    fn cancel_in_flight(&mut self) -> usize {
        let mut cancelled = 0;
        for speech in self.in_flight.drain(..) {
            if !speech.handle.is_finished() {
                speech.token.cancel();
                tracing::debug!(request_id = %speech.request_id, "Speech request cancelled");
                cancelled += 1;
            }
        }
        cancelled
    }

    fn prune_finished(&mut self) {
        self.in_flight.retain(|speech| !speech.handle.is_finished());
    }

    // Getters
    pub fn settings(&self) -> &PollySettings {
        &self.settings
    }

    pub fn voices(&self) -> &VoiceCatalog {
        &self.voices
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// 尚未结束的请求数
    pub fn in_flight_count(&self) -> usize {
        self.in_flight
            .iter()
            .filter(|speech| !speech.handle.is_finished())
            .count()
    }
}

impl Drop for PollyBackend {
    fn drop(&mut self) {
        self.release_client();
    }
}

/// 执行单个合成请求，结果通过事件发布
///
/// `stop_playback` 为 true 时先停止被打断的请求留下的播放
async fn run_speech(
    client: Arc<dyn PollyClientPort>,
    request: SynthesisRequest,
    stop_playback: bool,
    token: CancellationToken,
    events: Arc<EventPublisher>,
) {
    let request_id = request.request_id;
    let voice_id = request.voice_id.clone();

    if stop_playback {
        if let Err(e) = client.cancel().await {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to stop interrupted playback");
        }
    }

    tokio::select! {
        biased;

        _ = token.cancelled() => {
            events.publish_speech_cancelled(request_id);
        }
        result = client.synthesize(request) => match result {
            Ok(audio) => {
                tracing::info!(
                    request_id = %request_id,
                    voice_id = %voice_id,
                    audio_size = audio.data.len(),
                    "Speech completed"
                );
                events.publish_speech_completed(request_id, &voice_id, audio.data.len());
            }
            Err(e) => {
                tracing::error!(request_id = %request_id, error = %e, "Speech synthesis failed");
                events.publish_speech_failed(request_id, &e.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::backend::test_support::{
        build, configured, drain, outcome, stored_keys, unconfigured, ACCESS_KEY,
    };
    use crate::domain::{Engine, DEFAULT_VOICE_ID};
    use crate::infrastructure::adapters::FakePollyClientConfig;
    use crate::infrastructure::events::BackendEvent;

    fn gendered_settings() -> PollySettings {
        PollySettings {
            voice: "Joanna".to_string(),
            voice_male: "Brian".to_string(),
            voice_female: "Amy".to_string(),
            use_gendered_voice_presets: true,
            ..PollySettings::default()
        }
    }

    #[tokio::test]
    async fn test_new_without_credentials_leaves_client_unset() {
        let (backend, fixture) = unconfigured().await;

        assert!(!backend.has_client());
        assert!(backend.voices().is_empty());
        assert!(backend.last_error().is_none());
        assert_eq!(fixture.log.connects(), 0);
        assert!(fixture.log.list_voices_calls().is_empty());
    }

    #[tokio::test]
    async fn test_new_with_credentials_fetches_voices_for_configured_engine() {
        let settings = PollySettings {
            engine: Engine::Standard,
            ..PollySettings::default()
        };
        let (backend, fixture) = configured(settings).await;

        assert!(backend.has_client());
        assert_eq!(backend.voices().engine(), Some(Engine::Standard));
        assert_eq!(backend.voices().ids(), vec!["Hans", "Joey", "Marlene"]);
        assert_eq!(fixture.log.list_voices_calls(), vec![Engine::Standard]);
        assert_eq!(fixture.log.connects(), 1);
    }

    #[tokio::test]
    async fn test_new_connects_with_configured_region() {
        let settings = PollySettings {
            region: "us-east-1".to_string(),
            ..PollySettings::default()
        };
        let (_backend, fixture) = configured(settings).await;

        assert_eq!(
            fixture.log.connected_with(),
            vec![(ACCESS_KEY.to_string(), "us-east-1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_new_reports_voice_list_failure() {
        let config = FakePollyClientConfig {
            fail_list_voices: true,
            ..FakePollyClientConfig::default()
        };
        let (backend, mut fixture) = build(
            config,
            Some(stored_keys()),
            PollySettings::default(),
            BackendOptions::default(),
        )
        .await;

        assert!(backend.has_client());
        assert!(backend.voices().is_empty());
        assert!(backend.last_error().is_some());

        let events = drain(&mut fixture.events);
        assert!(events.iter().any(|e| matches!(
            e,
            BackendEvent::OperationFailed { operation, .. } if operation == "initialize"
        )));
    }

    #[tokio::test]
    async fn test_new_reports_connect_failure() {
        let config = FakePollyClientConfig {
            fail_connect: true,
            ..FakePollyClientConfig::default()
        };
        let (backend, _fixture) = build(
            config,
            Some(stored_keys()),
            PollySettings::default(),
            BackendOptions::default(),
        )
        .await;

        assert!(!backend.has_client());
        assert!(backend.voices().is_empty());
        assert!(backend.last_error().is_some());
    }

    #[tokio::test]
    async fn test_speak_selects_voice_by_gender() {
        let (mut backend, mut fixture) = configured(gendered_settings()).await;

        for (gender, expected) in [
            (Gender::Male, "Brian"),
            (Gender::Female, "Amy"),
            (Gender::Unspecified, "Joanna"),
        ] {
            let request_id = backend.speak(gender, "hello").unwrap();
            let event = outcome(&mut fixture.events, request_id).await;
            assert!(
                matches!(event, BackendEvent::SpeechCompleted { ref voice_id, .. } if voice_id == expected),
                "unexpected outcome for {:?}: {:?}",
                gender,
                event
            );
        }

        let voices: Vec<String> = fixture
            .log
            .synthesized()
            .into_iter()
            .map(|r| r.voice_id)
            .collect();
        assert_eq!(voices, vec!["Brian", "Amy", "Joanna"]);
    }

    #[tokio::test]
    async fn test_speak_ignores_gendered_voices_when_disabled() {
        let settings = PollySettings {
            use_gendered_voice_presets: false,
            ..gendered_settings()
        };
        let (mut backend, mut fixture) = configured(settings).await;

        for gender in [Gender::Male, Gender::Female] {
            let request_id = backend.speak(gender, "hello").unwrap();
            outcome(&mut fixture.events, request_id).await;
        }

        for request in fixture.log.synthesized() {
            assert_eq!(request.voice_id, "Joanna");
        }
    }

    #[tokio::test]
    async fn test_speak_falls_back_to_default_voice() {
        let settings = PollySettings {
            voice: "Hans".to_string(),
            voice_male: "Nobody".to_string(),
            voice_female: String::new(),
            use_gendered_voice_presets: true,
            ..PollySettings::default()
        };
        let (mut backend, mut fixture) = configured(settings).await;

        for gender in [Gender::Male, Gender::Female, Gender::Unspecified] {
            let request_id = backend.speak(gender, "fallback").unwrap();
            outcome(&mut fixture.events, request_id).await;
        }

        let synthesized = fixture.log.synthesized();
        assert_eq!(synthesized.len(), 3);
        for request in synthesized {
            assert_eq!(request.voice_id, DEFAULT_VOICE_ID);
            assert_eq!(request.engine, Engine::Neural);
        }
    }

    #[tokio::test]
    async fn test_speak_without_client_is_not_configured() {
        let (mut backend, _fixture) = unconfigured().await;

        let result = backend.speak(Gender::Unspecified, "hello");
        assert!(matches!(result, Err(ApplicationError::NotConfigured)));
        assert_eq!(backend.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn test_new_speech_cancels_previous() {
        let config = FakePollyClientConfig {
            synth_delay_ms: 200,
            ..FakePollyClientConfig::default()
        };
        let (mut backend, mut fixture) = build(
            config,
            Some(stored_keys()),
            PollySettings::default(),
            BackendOptions::default(),
        )
        .await;

        let first = backend.speak(Gender::Unspecified, "first").unwrap();
        let second = backend.speak(Gender::Unspecified, "second").unwrap();

        let first_outcome = outcome(&mut fixture.events, first).await;
        assert!(matches!(first_outcome, BackendEvent::SpeechCancelled { .. }));

        let second_outcome = outcome(&mut fixture.events, second).await;
        assert!(matches!(second_outcome, BackendEvent::SpeechCompleted { .. }));

        let texts: Vec<String> = fixture.log.synthesized().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, vec!["second"]);
        // 被打断的请求留下的播放也要停止
        assert_eq!(fixture.log.cancels(), 1);
    }

    #[tokio::test]
    async fn test_speak_when_idle_leaves_playback_alone() {
        let (mut backend, mut fixture) = configured(PollySettings::default()).await;

        let request_id = backend.speak(Gender::Unspecified, "hello").unwrap();
        outcome(&mut fixture.events, request_id).await;

        assert_eq!(fixture.log.cancels(), 0);
    }

    #[tokio::test]
    async fn test_speech_runs_concurrently_without_interrupt() {
        let config = FakePollyClientConfig {
            synth_delay_ms: 50,
            ..FakePollyClientConfig::default()
        };
        let options = BackendOptions {
            interrupt_previous: false,
            ..BackendOptions::default()
        };
        let (mut backend, mut fixture) =
            build(config, Some(stored_keys()), PollySettings::default(), options).await;

        let first = backend.speak(Gender::Unspecified, "first").unwrap();
        let second = backend.speak(Gender::Unspecified, "second").unwrap();
        assert_eq!(backend.in_flight_count(), 2);

        assert!(matches!(
            outcome(&mut fixture.events, first).await,
            BackendEvent::SpeechCompleted { .. }
        ));
        assert!(matches!(
            outcome(&mut fixture.events, second).await,
            BackendEvent::SpeechCompleted { .. }
        ));
        assert_eq!(fixture.log.cancels(), 0);
    }

    #[tokio::test]
    async fn test_failed_synthesis_is_published() {
        let config = FakePollyClientConfig {
            fail_synthesize: true,
            ..FakePollyClientConfig::default()
        };
        let (mut backend, mut fixture) = build(
            config,
            Some(stored_keys()),
            PollySettings::default(),
            BackendOptions::default(),
        )
        .await;

        let request_id = backend.speak(Gender::Female, "boom").unwrap();
        let event = outcome(&mut fixture.events, request_id).await;
        assert!(matches!(event, BackendEvent::SpeechFailed { .. }));
    }

    #[tokio::test]
    async fn test_cancel_say_without_client_is_noop() {
        let (mut backend, mut fixture) = unconfigured().await;

        backend.cancel_say().await;
        backend.cancel_say().await;

        assert_eq!(fixture.log.cancels(), 0);
        assert!(drain(&mut fixture.events).is_empty());
    }

    #[tokio::test]
    async fn test_cancel_say_when_idle_is_noop() {
        let (mut backend, mut fixture) = configured(PollySettings::default()).await;
        drain(&mut fixture.events);

        backend.cancel_say().await;

        assert_eq!(fixture.log.cancels(), 1);
        assert!(backend.last_error().is_none());
        assert!(!drain(&mut fixture.events)
            .iter()
            .any(|e| matches!(e, BackendEvent::OperationFailed { .. })));
    }

    #[tokio::test]
    async fn test_cancel_say_stops_in_flight_speech() {
        let config = FakePollyClientConfig {
            synth_delay_ms: 500,
            ..FakePollyClientConfig::default()
        };
        let (mut backend, mut fixture) = build(
            config,
            Some(stored_keys()),
            PollySettings::default(),
            BackendOptions::default(),
        )
        .await;

        let request_id = backend.speak(Gender::Unspecified, "long text").unwrap();
        backend.cancel_say().await;

        let event = outcome(&mut fixture.events, request_id).await;
        assert!(matches!(event, BackendEvent::SpeechCancelled { .. }));
        assert_eq!(backend.in_flight_count(), 0);
        assert!(fixture.log.synthesized().is_empty());
    }

    #[tokio::test]
    async fn test_drop_disposes_client_once() {
        let (backend, fixture) = configured(PollySettings::default()).await;
        assert_eq!(fixture.log.disposes(), 0);

        drop(backend);
        assert_eq!(fixture.log.disposes(), 1);
    }

    #[tokio::test]
    async fn test_drop_without_client_disposes_nothing() {
        let (backend, fixture) = unconfigured().await;
        drop(backend);
        assert_eq!(fixture.log.disposes(), 0);
    }
}
