//! Audio Session Manager - 音频会话生命周期管理
//!
//! 进程内唯一的音频会话状态持有者：
//! - activate / deactivate 由宿主应用生命周期调用
//! - 中断通知由平台异步投递（见 infrastructure/worker）
//!
//! 所有状态读写都在同一把异步锁内完成，包括等待平台响应的过程

use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};

use crate::application::ports::AudioPlatformPort;
use crate::domain::session::{
    Interruption, InterruptionPayload, SessionConfig, SessionError, SessionPhase, SessionState,
};
use crate::infrastructure::events::SessionEventPublisher;

/// Manager 配置
#[derive(Debug, Clone)]
pub struct SessionManagerConfig {
    /// 单次平台请求的最长等待时间
    pub request_timeout: Duration,
}

impl Default for SessionManagerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(2000),
        }
    }
}

/// 会话状态快照（只读）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub is_active: bool,
    pub was_interrupted: bool,
    pub last_changed: DateTime<Utc>,
}

impl SessionSnapshot {
    fn from_state(state: &SessionState) -> Self {
        Self {
            phase: state.phase(),
            is_active: state.is_active(),
            was_interrupted: state.was_interrupted(),
            last_changed: Utc::now(),
        }
    }
}

struct Inner {
    state: SessionState,
    /// 最后一次成功激活的配置，中断恢复时使用
    last_config: Option<SessionConfig>,
}

/// 音频会话管理器
pub struct AudioSessionManager {
    config: SessionManagerConfig,
    platform: Arc<dyn AudioPlatformPort>,
    event_publisher: Arc<SessionEventPublisher>,
    inner: Mutex<Inner>,
    snapshot: watch::Sender<SessionSnapshot>,
}

impl AudioSessionManager {
    pub fn new(
        config: SessionManagerConfig,
        platform: Arc<dyn AudioPlatformPort>,
        event_publisher: Arc<SessionEventPublisher>,
    ) -> Self {
        let state = SessionState::new();
        let (snapshot, _) = watch::channel(SessionSnapshot::from_state(&state));
        Self {
            config,
            platform,
            event_publisher,
            inner: Mutex::new(Inner {
                state,
                last_config: None,
            }),
            snapshot,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 激活音频会话
    ///
    /// 依次向平台申请类别配置与激活，成功后记录配置供中断恢复使用。
    /// 失败时状态保持不变，不自动重试
    pub async fn activate(&self, config: SessionConfig) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        let result = self.activate_locked(&mut inner, config).await;
        if let Err(e) = &result {
            tracing::error!(
                platform = self.platform.name(),
                error = %e,
                "Failed to activate audio session"
            );
            self.event_publisher.publish_activation_failed(e);
        }
        result
    }

    /// 停用音频会话并通知其他进程
    ///
    /// 未激活时为空操作。失败只记录日志，不重试
    pub async fn deactivate(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;

        if !inner.state.is_active() {
            tracing::debug!(phase = ?inner.state.phase(), "Audio session not active, nothing to deactivate");
            return Ok(());
        }

        let options = inner
            .last_config
            .as_ref()
            .map(|c| c.activation_options())
            .unwrap_or_default();

        let result = self
            .bounded("set_active(false)", self.platform.set_active(false, options))
            .await
            .and_then(|r| r.map_err(|e| SessionError::DeactivationFailed(e.to_string())));

        match result {
            Ok(()) => {
                inner.state.mark_inactive();
                self.publish_state(&inner.state);
                self.event_publisher.publish_deactivated();
                tracing::info!(
                    notify_others = options.notify_others_on_deactivation,
                    "Audio session deactivated"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to deactivate audio session");
                self.event_publisher.publish_deactivation_failed(&e);
                Err(e)
            }
        }
    }

    /// 中断开始：音频资源已被夺走，不尝试恢复
    pub async fn on_interruption_begin(&self) {
        let mut inner = self.inner.lock().await;
        let was_active = inner.state.is_active();
        inner.state.begin_interruption();
        self.publish_state(&inner.state);
        self.event_publisher.publish_interruption_began();
        tracing::info!(was_active = was_active, "Audio session interrupted");
    }

    /// 中断结束
    ///
    /// 先清除中断标志，再按 `should_resume` 用最后一次的配置尝试激活一次。
    /// 恢复失败时返回错误并发布 ReactivationFailed 事件。
    /// 会话仍处于激活状态（没有对应的中断开始）时不再重复激活
    pub async fn on_interruption_end(&self, should_resume: bool) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        inner.state.end_interruption();
        self.publish_state(&inner.state);
        self.event_publisher.publish_interruption_ended(should_resume);

        if !should_resume {
            tracing::info!(phase = ?inner.state.phase(), "Interruption ended without resume hint");
            return Ok(());
        }

        if inner.state.is_active() {
            tracing::debug!("Resume hint received while session is active, nothing to resume");
            return Ok(());
        }

        let Some(config) = inner.last_config.clone() else {
            tracing::warn!("Interruption ended with resume hint but session was never activated");
            return Ok(());
        };

        match self.activate_locked(&mut inner, config).await {
            Ok(()) => {
                tracing::info!("Audio session resumed after interruption");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reactivate audio session");
                self.event_publisher.publish_reactivation_failed(&e);
                Err(e)
            }
        }
    }

    /// 处理平台投递的原始中断通知
    ///
    /// 无法解析的通知只记录日志，不改变状态
    pub async fn handle_interruption(&self, payload: &InterruptionPayload) {
        match payload.parse() {
            Ok(Interruption::Began) => self.on_interruption_begin().await,
            Ok(Interruption::Ended { should_resume }) => {
                // 失败已在 on_interruption_end 中记录并发布
                let _ = self.on_interruption_end(should_resume).await;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    payload = ?payload.fields(),
                    "Ignoring malformed interruption notification"
                );
                self.event_publisher.publish_malformed_interruption(&e.to_string());
            }
        }
    }

    /// 当前状态快照
    pub fn snapshot(&self) -> SessionSnapshot {
        *self.snapshot.borrow()
    }

    pub fn phase(&self) -> SessionPhase {
        self.snapshot.borrow().phase
    }

    pub fn is_active(&self) -> bool {
        self.snapshot.borrow().is_active
    }

    /// 订阅状态变化
    pub fn subscribe_state(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    /// 最后一次成功激活的配置
    pub async fn last_config(&self) -> Option<SessionConfig> {
        self.inner.lock().await.last_config.clone()
    }

    async fn activate_locked(
        &self,
        inner: &mut Inner,
        config: SessionConfig,
    ) -> Result<(), SessionError> {
        self.bounded("set_category", self.platform.set_category(&config))
            .await?
            .map_err(|e| SessionError::ConfigurationRejected(e.to_string()))?;

        self.bounded(
            "set_active(true)",
            self.platform.set_active(true, config.activation_options()),
        )
        .await?
        .map_err(|e| SessionError::ActivationRejected(e.to_string()))?;

        inner.state.mark_active();
        self.publish_state(&inner.state);
        self.event_publisher.publish_activated(config.category());

        tracing::info!(
            platform = self.platform.name(),
            category = %config.category(),
            mode = %config.mode(),
            mixing_policy = ?config.mixing_policy(),
            interrupts_others = config.interrupts_others(),
            silent_mode_playback = config.allow_playback_in_silent_mode(),
            "Audio session activated"
        );

        inner.last_config = Some(config);
        Ok(())
    }

    /// 为平台请求加上超时
    async fn bounded<T>(
        &self,
        operation: &'static str,
        request: impl Future<Output = T>,
    ) -> Result<T, SessionError> {
        tokio::time::timeout(self.config.request_timeout, request)
            .await
            .map_err(|_| {
                let timeout_ms = self.config.request_timeout.as_millis() as u64;
                tracing::warn!(operation, timeout_ms, "Platform request timed out");
                SessionError::Timeout {
                    operation,
                    timeout_ms,
                }
            })
    }

    fn publish_state(&self, state: &SessionState) {
        self.snapshot.send_replace(SessionSnapshot::from_state(state));
    }
}
