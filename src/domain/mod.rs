//! Domain Layer - 领域层
//!
//! 包含一个限界上下文:
//! - Session Context: 音频会话配置、状态机与中断通知

pub mod session;
