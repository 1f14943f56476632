//! AWS Polly Client - 调用 Amazon Polly
//!
//! 实现 PollyClientPort，请求签名与传输由 aws-sdk-polly 完成
//!
//! 使用的 API:
//! - DescribeVoices: 按引擎列出音色（分页）
//! - SynthesizeSpeech: MP3 输出，交给 AudioSinkPort 播放

use async_trait::async_trait;
use aws_sdk_polly::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_polly::error::{DisplayErrorContext, SdkError};
use aws_sdk_polly::types::{Engine as SdkEngine, OutputFormat, VoiceId};
use aws_sdk_polly::Client;
use std::sync::{Arc, PoisonError, RwLock};

use crate::application::ports::{
    AccessKeys, AudioSinkPort, PollyClientFactory, PollyClientPort, SpeechAudio,
    SynthesisRequest, TtsError,
};
use crate::domain::{Engine, VoiceEntry};

/// 静态凭据的来源名称
const CREDENTIALS_PROVIDER_NAME: &str = "polly-voice-secret-store";

fn map_sdk_error<E, R>(err: SdkError<E, R>) -> TtsError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&err).to_string();
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => TtsError::NetworkError(message),
        SdkError::ResponseError(_) => TtsError::InvalidResponse(message),
        _ => TtsError::ServiceError(message),
    }
}

/// AWS Polly 客户端工厂
pub struct AwsPollyClientFactory {
    sink: Arc<dyn AudioSinkPort>,
}

impl AwsPollyClientFactory {
    pub fn new(sink: Arc<dyn AudioSinkPort>) -> Self {
        Self { sink }
    }
}

impl PollyClientFactory for AwsPollyClientFactory {
    fn connect(
        &self,
        keys: &AccessKeys,
        region: &str,
    ) -> Result<Arc<dyn PollyClientPort>, TtsError> {
        if keys.access_key().is_empty() || keys.secret_key().is_empty() {
            return Err(TtsError::InvalidCredentials(
                "access key and secret key must not be empty".to_string(),
            ));
        }

        let credentials = Credentials::new(
            keys.access_key(),
            keys.secret_key(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );
        let config = aws_sdk_polly::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .build();

        tracing::debug!(region = %region, "Building Amazon Polly client");

        Ok(Arc::new(AwsPollyClient {
            client: RwLock::new(Some(Client::from_conf(config))),
            sink: self.sink.clone(),
        }))
    }
}

/// AWS Polly 客户端
pub struct AwsPollyClient {
    /// dispose 之后为 None
    client: RwLock<Option<Client>>,
    sink: Arc<dyn AudioSinkPort>,
}

impl AwsPollyClient {
    fn client(&self) -> Result<Client, TtsError> {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(TtsError::Disposed)
    }
}

#[async_trait]
impl PollyClientPort for AwsPollyClient {
    async fn list_voices(&self, engine: Engine) -> Result<Vec<VoiceEntry>, TtsError> {
        let client = self.client()?;
        let mut voices = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = client
                .describe_voices()
                .engine(SdkEngine::from(engine.as_str()))
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(map_sdk_error)?;

            for voice in output.voices() {
                if let Some(id) = voice.id() {
                    let name = voice.name().unwrap_or(id.as_str());
                    voices.push(VoiceEntry::new(id.as_str(), name));
                }
            }

            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        tracing::debug!(engine = %engine, count = voices.len(), "Polly voices described");
        Ok(voices)
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SpeechAudio, TtsError> {
        let client = self.client()?;

        tracing::debug!(
            request_id = %request.request_id,
            voice_id = %request.voice_id,
            engine = %request.engine,
            text_len = request.text.len(),
            "Sending SynthesizeSpeech request"
        );

        let output = client
            .synthesize_speech()
            .engine(SdkEngine::from(request.engine.as_str()))
            .output_format(OutputFormat::Mp3)
            .voice_id(VoiceId::from(request.voice_id.as_str()))
            .text(request.text.clone())
            .send()
            .await
            .map_err(map_sdk_error)?;

        let data = output
            .audio_stream
            .collect()
            .await
            .map_err(|e| TtsError::InvalidResponse(format!("Failed to read audio: {}", e)))?
            .into_bytes()
            .to_vec();

        let audio = SpeechAudio {
            request_id: request.request_id,
            voice_id: request.voice_id,
            data,
        };

        self.sink.play(&audio).await?;
        Ok(audio)
    }

    async fn cancel(&self) -> Result<(), TtsError> {
        self.sink.stop().await
    }

    fn dispose(&self) {
        let previous = self
            .client
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            tracing::debug!("Amazon Polly client released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::audio::FileAudioSink;
    use tempfile::TempDir;

    fn factory(temp_dir: &TempDir) -> AwsPollyClientFactory {
        AwsPollyClientFactory::new(Arc::new(FileAudioSink::new(temp_dir.path())))
    }

    #[test]
    fn test_connect_rejects_empty_keys() {
        let temp_dir = TempDir::new().unwrap();
        let result = factory(&temp_dir).connect(&AccessKeys::new("", "secret"), "eu-west-1");
        assert!(matches!(result, Err(TtsError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_disposed_client_refuses_requests() {
        let temp_dir = TempDir::new().unwrap();
        let client = factory(&temp_dir)
            .connect(&AccessKeys::new("AKIDEXAMPLE", "secret"), "eu-west-1")
            .unwrap();
        client.dispose();

        let result = client.list_voices(Engine::Neural).await;
        assert!(matches!(result, Err(TtsError::Disposed)));
    }
}
