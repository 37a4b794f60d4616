//! Platform Adapter - 平台音频服务实现

mod simulated_platform;

pub use simulated_platform::{PlatformCall, SimulatedAudioPlatform, SimulatedPlatformConfig};
