//! Events Layer - 会话事件发布

mod publisher;

pub use publisher::{SessionEvent, SessionEventPublisher};
