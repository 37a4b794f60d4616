//! Session Context - 音频会话限界上下文
//!
//! 职责:
//! - 会话配置（类别、模式、混音策略）
//! - 会话状态机（Inactive / Active / Interrupted）
//! - 中断通知解析

mod errors;
mod interruption;
mod state;
mod value_objects;

pub use errors::{SessionError, SessionErrorKind};
pub use interruption::{
    Interruption, InterruptionPayload, INTERRUPTION_OPTIONS_KEY, INTERRUPTION_TYPE_KEY,
};
pub use state::{SessionPhase, SessionState};
pub use value_objects::{
    ActivationOptions, MixingOption, MixingPolicy, SessionCategory, SessionConfig, SessionMode,
};
