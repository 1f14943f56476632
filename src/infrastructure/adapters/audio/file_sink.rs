//! File Audio Sink - 把合成结果写入目录
//!
//! 实现 AudioSinkPort：每条语音保存为 `<output_dir>/<request_id>.mp3`，
//! 由外部播放器消费。目录中只保留最近 `keep_files` 条

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::fs;

use crate::application::ports::{AudioSinkPort, SpeechAudio, TtsError};

/// 默认保留的语音文件数
pub const DEFAULT_KEEP_FILES: usize = 32;

/// 文件音频输出
pub struct FileAudioSink {
    output_dir: PathBuf,
    keep_files: usize,
    /// 本实例写出的文件，旧的在前
    written: Mutex<VecDeque<PathBuf>>,
    /// stop 调用次数
    stops: AtomicU64,
}

impl FileAudioSink {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self::with_retention(output_dir, DEFAULT_KEEP_FILES)
    }

    pub fn with_retention(output_dir: impl AsRef<Path>, keep_files: usize) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            keep_files: keep_files.max(1),
            written: Mutex::new(VecDeque::new()),
            stops: AtomicU64::new(0),
        }
    }

    /// 删除上次运行留下的语音文件，返回删除数量
    pub async fn clear_stale(&self) -> std::io::Result<usize> {
        let mut entries = match fs::read_dir(&self.output_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "mp3") {
                fs::remove_file(&path).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// 记录新文件，返回超出保留数量的旧文件
    fn track(&self, path: PathBuf) -> Vec<PathBuf> {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        written.push_back(path);
        let excess = written.len().saturating_sub(self.keep_files);
        written.drain(..excess).collect()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn audio_path(&self, audio: &SpeechAudio) -> PathBuf {
        self.output_dir.join(format!("{}.mp3", audio.request_id))
    }
}

#[async_trait]
impl AudioSinkPort for FileAudioSink {
    async fn play(&self, audio: &SpeechAudio) -> Result<(), TtsError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| TtsError::PlaybackError(e.to_string()))?;

        let path = self.audio_path(audio);
        fs::write(&path, &audio.data)
            .await
            .map_err(|e| TtsError::PlaybackError(e.to_string()))?;

        tracing::debug!(
            request_id = %audio.request_id,
            path = %path.display(),
            size = audio.data.len(),
            "Speech audio written"
        );

        for old in self.track(path) {
            if let Err(e) = fs::remove_file(&old).await {
                tracing::warn!(path = %old.display(), error = %e, "Failed to remove old speech audio");
            }
        }
        Ok(())
    }

    async fn stop(&self) -> Result<(), TtsError> {
        let count = self.stops.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(stops = count, "File audio sink stop requested");
        Ok(())
    }
}
