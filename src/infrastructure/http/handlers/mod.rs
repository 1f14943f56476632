//! HTTP Handlers

mod ping;
mod settings;
mod speech;
mod websocket;

pub use ping::*;
pub use settings::*;
pub use speech::*;
pub use websocket::*;
