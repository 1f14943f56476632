//! Audio Adapter - 音频输出

mod file_sink;

pub use file_sink::FileAudioSink;
