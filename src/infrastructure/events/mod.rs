//! Events - 后端事件发布

mod publisher;

pub use publisher::{BackendEvent, EventPublisher};
