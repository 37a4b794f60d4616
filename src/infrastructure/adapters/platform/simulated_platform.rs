//! Simulated Audio Platform - 进程内模拟的平台音频服务
//!
//! 不接入真实系统音频服务，记录所有请求，并可按配置拒绝请求、注入延迟、
//! 投递中断通知。宿主程序与测试均使用该实现

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::application::ports::{AudioPlatformPort, PlatformError};
use crate::domain::session::{
    ActivationOptions, InterruptionPayload, MixingPolicy, SessionCategory, SessionConfig,
    SessionMode,
};
use crate::infrastructure::worker::InterruptionSink;

/// Simulated Platform 配置
#[derive(Debug, Clone, Default)]
pub struct SimulatedPlatformConfig {
    /// 每次请求的模拟延迟（毫秒）
    pub latency_ms: u64,
    /// 激活请求额外延迟（毫秒）
    pub activation_latency_ms: u64,
    /// 停用请求额外延迟（毫秒）
    pub deactivation_latency_ms: u64,
    /// 拒绝类别配置
    pub reject_category: bool,
    /// 拒绝激活（模拟更高优先级会话独占音频资源）
    pub reject_activation: bool,
    /// 停用失败
    pub reject_deactivation: bool,
}

/// 平台收到的请求记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    SetCategory {
        category: SessionCategory,
        mode: SessionMode,
        mixing_policy: MixingPolicy,
        allow_playback_in_silent_mode: bool,
    },
    SetActive {
        active: bool,
        notify_others_on_deactivation: bool,
    },
}

/// 模拟平台音频服务
pub struct SimulatedAudioPlatform {
    latency: Duration,
    activation_latency: Duration,
    deactivation_latency: Duration,
    reject_category: AtomicBool,
    reject_activation: AtomicBool,
    reject_deactivation: AtomicBool,
    /// 平台侧的会话激活状态
    active: AtomicBool,
    calls: Mutex<Vec<PlatformCall>>,
    interruption_sink: Option<InterruptionSink>,
}

impl SimulatedAudioPlatform {
    pub fn new(config: SimulatedPlatformConfig) -> Self {
        tracing::info!(
            latency_ms = config.latency_ms,
            reject_category = config.reject_category,
            reject_activation = config.reject_activation,
            "SimulatedAudioPlatform initialized"
        );
        Self {
            latency: Duration::from_millis(config.latency_ms),
            activation_latency: Duration::from_millis(config.activation_latency_ms),
            deactivation_latency: Duration::from_millis(config.deactivation_latency_ms),
            reject_category: AtomicBool::new(config.reject_category),
            reject_activation: AtomicBool::new(config.reject_activation),
            reject_deactivation: AtomicBool::new(config.reject_deactivation),
            active: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
            interruption_sink: None,
        }
    }

    /// 绑定中断通知的投递队列
    pub fn with_interruption_sink(mut self, sink: InterruptionSink) -> Self {
        self.interruption_sink = Some(sink);
        self
    }

    pub fn set_reject_category(&self, reject: bool) {
        self.reject_category.store(reject, Ordering::SeqCst);
    }

    pub fn set_reject_activation(&self, reject: bool) {
        self.reject_activation.store(reject, Ordering::SeqCst);
    }

    pub fn set_reject_deactivation(&self, reject: bool) {
        self.reject_deactivation.store(reject, Ordering::SeqCst);
    }

    /// 平台侧会话是否处于激活状态
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// 已收到的全部请求
    pub async fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().await.clone()
    }

    /// 激活请求次数
    pub async fn activation_attempts(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| matches!(c, PlatformCall::SetActive { active: true, .. }))
            .count()
    }

    /// 模拟其他进程夺走音频资源
    pub fn interrupt(&self) -> bool {
        self.active.store(false, Ordering::SeqCst);
        self.deliver(InterruptionPayload::began())
    }

    /// 模拟中断结束
    pub fn end_interruption(&self, should_resume: bool) -> bool {
        self.deliver(InterruptionPayload::ended(should_resume))
    }

    /// 投递任意通知（包括无法解析的通知）
    pub fn deliver(&self, payload: InterruptionPayload) -> bool {
        match &self.interruption_sink {
            Some(sink) => sink.post(payload),
            None => {
                tracing::warn!("No interruption sink attached, notification dropped");
                false
            }
        }
    }

    async fn record(&self, call: PlatformCall, extra_latency: Duration) {
        self.calls.lock().await.push(call);
        let latency = self.latency + extra_latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl AudioPlatformPort for SimulatedAudioPlatform {
    async fn set_category(&self, config: &SessionConfig) -> Result<(), PlatformError> {
        self.record(
            PlatformCall::SetCategory {
                category: config.category(),
                mode: config.mode(),
                mixing_policy: config.mixing_policy(),
                allow_playback_in_silent_mode: config.allow_playback_in_silent_mode(),
            },
            Duration::ZERO,
        )
        .await;

        if self.reject_category.load(Ordering::SeqCst) {
            return Err(PlatformError::Rejected(format!(
                "category {} not permitted",
                config.category()
            )));
        }

        tracing::debug!(
            category = %config.category(),
            mode = %config.mode(),
            "SimulatedAudioPlatform: category applied"
        );
        Ok(())
    }

    async fn set_active(
        &self,
        active: bool,
        options: ActivationOptions,
    ) -> Result<(), PlatformError> {
        let extra_latency = if active {
            self.activation_latency
        } else {
            self.deactivation_latency
        };
        self.record(
            PlatformCall::SetActive {
                active,
                notify_others_on_deactivation: options.notify_others_on_deactivation,
            },
            extra_latency,
        )
        .await;

        if active && self.reject_activation.load(Ordering::SeqCst) {
            return Err(PlatformError::Rejected(
                "audio resource held by a higher-priority session".to_string(),
            ));
        }
        if !active && self.reject_deactivation.load(Ordering::SeqCst) {
            return Err(PlatformError::Unavailable(
                "audio service did not acknowledge deactivation".to_string(),
            ));
        }

        self.active.store(active, Ordering::SeqCst);
        tracing::debug!(active = active, "SimulatedAudioPlatform: activation changed");
        Ok(())
    }

    fn name(&self) -> &str {
        "simulated"
    }
}
