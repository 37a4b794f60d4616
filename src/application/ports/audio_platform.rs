//! Audio Platform Port - 平台音频服务抽象
//!
//! 定义与系统共享音频服务交互的接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::session::{ActivationOptions, SessionConfig};

/// 平台错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// 平台拒绝了请求（例如更高优先级的会话独占了音频资源）
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// 平台音频服务不可用
    #[error("Audio service unavailable: {0}")]
    Unavailable(String),
}

/// Audio Platform Port
///
/// 进程共享的系统音频服务。每次调用都是一次平台请求，
/// 超时由调用方（AudioSessionManager）负责
#[async_trait]
pub trait AudioPlatformPort: Send + Sync {
    /// 申请会话类别、模式与混音选项
    async fn set_category(&self, config: &SessionConfig) -> Result<(), PlatformError>;

    /// 激活或停用会话
    async fn set_active(
        &self,
        active: bool,
        options: ActivationOptions,
    ) -> Result<(), PlatformError>;

    /// 平台名称（用于日志）
    fn name(&self) -> &str {
        "platform"
    }
}
