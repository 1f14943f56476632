//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("未知的引擎: {0}")]
    UnknownEngine(String),

    #[error("未知的区域: {0}")]
    UnknownRegion(String),
}
