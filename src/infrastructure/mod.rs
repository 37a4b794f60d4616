//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod events;
pub mod worker;

pub use adapters::{SimulatedAudioPlatform, SimulatedPlatformConfig};
pub use events::{SessionEvent, SessionEventPublisher};
pub use worker::{interruption_channel, InterruptionSink, InterruptionWorker};
