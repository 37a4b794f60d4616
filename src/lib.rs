//! AudioSession - 音频会话生命周期管理
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Session Context: 会话配置、状态机、中断通知解析
//!
//! 应用层 (application/):
//! - Ports: 端口定义（AudioPlatformPort）
//! - AudioSessionManager: 激活、停用与中断恢复
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: SimulatedAudioPlatform
//! - Worker: InterruptionWorker 中断通知队列处理
//! - Events: 会话事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{AudioSessionManager, SessionManagerConfig, SessionSnapshot};
pub use config::{load_config, AppConfig};
pub use domain::session::{SessionConfig, SessionError, SessionPhase};
