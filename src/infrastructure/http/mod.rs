//! HTTP Layer - RESTful API + WebSocket
//!
//! 宿主侧的 HTTP 外壳：朗读、停止、设置表单与事件推送

pub mod dto;
pub mod error;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use form::{FormInput, FormWidget, JsonFormUi, RenderedForm};
pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig};
pub use state::AppState;
