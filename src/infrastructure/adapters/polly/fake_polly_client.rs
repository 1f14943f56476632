//! Fake Polly Client - 用于测试的 Polly 客户端
//!
//! 每个引擎返回固定的音色列表，记录所有调用，不访问网络

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::application::ports::{
    AccessKeys, PollyClientFactory, PollyClientPort, SpeechAudio, SynthesisRequest, TtsError,
};
use crate::domain::{Engine, VoiceEntry};

/// Fake Polly Client 配置
#[derive(Debug, Clone)]
pub struct FakePollyClientConfig {
    /// 每个引擎的固定音色列表
    pub voices: HashMap<Engine, Vec<VoiceEntry>>,
    /// 模拟合成耗时（毫秒）
    pub synth_delay_ms: u64,
    /// list_voices 返回错误
    pub fail_list_voices: bool,
    /// synthesize 返回错误
    pub fail_synthesize: bool,
    /// connect 返回错误
    pub fail_connect: bool,
}

impl Default for FakePollyClientConfig {
    fn default() -> Self {
        let mut voices = HashMap::new();
        voices.insert(
            Engine::Neural,
            vec![
                VoiceEntry::new("Amy", "Amy"),
                VoiceEntry::new("Brian", "Brian"),
                VoiceEntry::new("Joanna", "Joanna"),
                VoiceEntry::new("Matthew", "Matthew"),
            ],
        );
        voices.insert(
            Engine::Standard,
            vec![
                VoiceEntry::new("Hans", "Hans"),
                VoiceEntry::new("Joey", "Joey"),
                VoiceEntry::new("Marlene", "Marlene"),
            ],
        );
        Self {
            voices,
            synth_delay_ms: 0,
            fail_list_voices: false,
            fail_synthesize: false,
            fail_connect: false,
        }
    }
}

/// 所有 fake 客户端共享的调用记录
#[derive(Debug, Default)]
pub struct FakeCallLog {
    connects: AtomicUsize,
    disposes: AtomicUsize,
    cancels: AtomicUsize,
    connected_with: Mutex<Vec<(String, String)>>,
    list_voices_calls: Mutex<Vec<Engine>>,
    synthesized: Mutex<Vec<SynthesisRequest>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeCallLog {
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disposes(&self) -> usize {
        self.disposes.load(Ordering::SeqCst)
    }

    pub fn cancels(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }

    /// (access key, region) of every connect
    pub fn connected_with(&self) -> Vec<(String, String)> {
        lock(&self.connected_with).clone()
    }

    pub fn list_voices_calls(&self) -> Vec<Engine> {
        lock(&self.list_voices_calls).clone()
    }

    /// 已完成的合成请求
    pub fn synthesized(&self) -> Vec<SynthesisRequest> {
        lock(&self.synthesized).clone()
    }
}

/// Fake Polly 客户端工厂
pub struct FakePollyClientFactory {
    config: FakePollyClientConfig,
    log: Arc<FakeCallLog>,
    fail_connect: AtomicBool,
}

impl FakePollyClientFactory {
    pub fn new(config: FakePollyClientConfig) -> Self {
        let fail_connect = AtomicBool::new(config.fail_connect);
        Self {
            config,
            log: Arc::new(FakeCallLog::default()),
            fail_connect,
        }
    }

    /// 之后的 connect 是否失败
    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    pub fn log(&self) -> Arc<FakeCallLog> {
        self.log.clone()
    }
}

impl PollyClientFactory for FakePollyClientFactory {
    fn connect(
        &self,
        keys: &AccessKeys,
        region: &str,
    ) -> Result<Arc<dyn PollyClientPort>, TtsError> {
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(TtsError::InvalidCredentials("fake connect failure".to_string()));
        }

        self.log.connects.fetch_add(1, Ordering::SeqCst);
        lock(&self.log.connected_with).push((keys.access_key().to_string(), region.to_string()));

        tracing::debug!(region = %region, "FakePollyClient connected");

        Ok(Arc::new(FakePollyClient {
            config: self.config.clone(),
            log: self.log.clone(),
            disposed: AtomicBool::new(false),
        }))
    }
}

/// Fake Polly Client
pub struct FakePollyClient {
    config: FakePollyClientConfig,
    log: Arc<FakeCallLog>,
    disposed: AtomicBool,
}

impl FakePollyClient {
    fn ensure_live(&self) -> Result<(), TtsError> {
        if self.disposed.load(Ordering::SeqCst) {
            Err(TtsError::Disposed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PollyClientPort for FakePollyClient {
    async fn list_voices(&self, engine: Engine) -> Result<Vec<VoiceEntry>, TtsError> {
        self.ensure_live()?;
        lock(&self.log.list_voices_calls).push(engine);

        if self.config.fail_list_voices {
            return Err(TtsError::NetworkError("fake list_voices failure".to_string()));
        }

        Ok(self.config.voices.get(&engine).cloned().unwrap_or_default())
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SpeechAudio, TtsError> {
        self.ensure_live()?;

        if self.config.synth_delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.synth_delay_ms))
                .await;
        }

        if self.config.fail_synthesize {
            return Err(TtsError::ServiceError("fake synthesize failure".to_string()));
        }

        tracing::debug!(
            request_id = %request.request_id,
            voice_id = %request.voice_id,
            "FakePollyClient: returning fixed audio"
        );

        let audio = SpeechAudio {
            request_id: request.request_id,
            voice_id: request.voice_id.clone(),
            data: request.text.as_bytes().to_vec(),
        };
        lock(&self.log.synthesized).push(request);
        Ok(audio)
    }

    async fn cancel(&self) -> Result<(), TtsError> {
        self.log.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            self.log.disposes.fetch_add(1, Ordering::SeqCst);
        }
    }
}
