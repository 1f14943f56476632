//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod audio;
pub mod polly;
pub mod secrets;
pub mod settings;

pub use audio::*;
pub use polly::*;
pub use secrets::*;
pub use settings::*;
