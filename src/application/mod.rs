//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（AudioPlatformPort）
//! - session_manager: 音频会话生命周期管理

pub mod ports;
pub mod session_manager;

pub use ports::{AudioPlatformPort, PlatformError};
pub use session_manager::{AudioSessionManager, SessionManagerConfig, SessionSnapshot};
