//! Session Context - Errors

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("音频会话配置被拒绝: {0}")]
    ConfigurationRejected(String),

    #[error("音频会话激活被拒绝: {0}")]
    ActivationRejected(String),

    #[error("音频会话停用失败: {0}")]
    DeactivationFailed(String),

    #[error("{operation} 超时 ({timeout_ms}ms)")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("无效的中断通知: {0}")]
    MalformedInterruptionPayload(String),
}

/// 错误类别（供事件监听者使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionErrorKind {
    ConfigurationRejected,
    ActivationRejected,
    DeactivationFailed,
    Timeout,
    MalformedInterruptionPayload,
}

impl SessionError {
    pub fn kind(&self) -> SessionErrorKind {
        match self {
            SessionError::ConfigurationRejected(_) => SessionErrorKind::ConfigurationRejected,
            SessionError::ActivationRejected(_) => SessionErrorKind::ActivationRejected,
            SessionError::DeactivationFailed(_) => SessionErrorKind::DeactivationFailed,
            SessionError::Timeout { .. } => SessionErrorKind::Timeout,
            SessionError::MalformedInterruptionPayload(_) => {
                SessionErrorKind::MalformedInterruptionPayload
            }
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInterruptionPayload(message.into())
    }
}
