//! Event Publisher Implementation
//!
//! 会话事件推送实现，监听者通过 broadcast 订阅

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::domain::session::{SessionCategory, SessionError, SessionErrorKind};

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// 会话事件类型
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum SessionEvent {
    /// 会话已激活
    Activated {
        category: SessionCategory,
        at: DateTime<Utc>,
    },
    /// 激活失败（调用方主动激活）
    ActivationFailed {
        kind: SessionErrorKind,
        error: String,
    },
    /// 会话已停用
    Deactivated { at: DateTime<Utc> },
    /// 停用失败
    DeactivationFailed {
        kind: SessionErrorKind,
        error: String,
    },
    /// 中断开始
    InterruptionBegan { at: DateTime<Utc> },
    /// 中断结束
    InterruptionEnded {
        should_resume: bool,
        at: DateTime<Utc>,
    },
    /// 中断结束后的恢复激活失败
    ReactivationFailed {
        kind: SessionErrorKind,
        error: String,
    },
    /// 无法解析的中断通知（已忽略）
    MalformedInterruption { reason: String },
}

/// 事件发布器
pub struct SessionEventPublisher {
    channel: broadcast::Sender<SessionEvent>,
}

impl SessionEventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { channel: tx }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅会话事件
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.channel.subscribe()
    }

    /// 当前订阅者数量
    pub fn listener_count(&self) -> usize {
        self.channel.receiver_count()
    }

    pub fn publish_activated(&self, category: SessionCategory) {
        self.publish(SessionEvent::Activated {
            category,
            at: Utc::now(),
        });
    }

    pub fn publish_activation_failed(&self, error: &SessionError) {
        self.publish(SessionEvent::ActivationFailed {
            kind: error.kind(),
            error: error.to_string(),
        });
    }

    pub fn publish_deactivated(&self) {
        self.publish(SessionEvent::Deactivated { at: Utc::now() });
    }

    pub fn publish_deactivation_failed(&self, error: &SessionError) {
        self.publish(SessionEvent::DeactivationFailed {
            kind: error.kind(),
            error: error.to_string(),
        });
    }

    pub fn publish_interruption_began(&self) {
        self.publish(SessionEvent::InterruptionBegan { at: Utc::now() });
    }

    pub fn publish_interruption_ended(&self, should_resume: bool) {
        self.publish(SessionEvent::InterruptionEnded {
            should_resume,
            at: Utc::now(),
        });
    }

    pub fn publish_reactivation_failed(&self, error: &SessionError) {
        self.publish(SessionEvent::ReactivationFailed {
            kind: error.kind(),
            error: error.to_string(),
        });
    }

    pub fn publish_malformed_interruption(&self, reason: &str) {
        self.publish(SessionEvent::MalformedInterruption {
            reason: reason.to_string(),
        });
    }

    fn publish(&self, event: SessionEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::debug!(error = %e, "Failed to publish session event (no receivers)");
        }
    }
}

impl Default for SessionEventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listener_receives_events_in_order() {
        let publisher = SessionEventPublisher::new();
        let mut rx = publisher.subscribe();
        assert_eq!(publisher.listener_count(), 1);

        publisher.publish_activated(SessionCategory::Playback);
        publisher.publish_interruption_began();

        assert!(matches!(
            rx.recv().await.unwrap(),
            SessionEvent::Activated {
                category: SessionCategory::Playback,
                ..
            }
        ));
        assert!(matches!(
            rx.recv().await.unwrap(),
            SessionEvent::InterruptionBegan { .. }
        ));
    }

    #[test]
    fn test_publish_without_listeners_is_silent() {
        let publisher = SessionEventPublisher::new();
        publisher.publish_deactivated();
        assert_eq!(publisher.listener_count(), 0);
    }

    #[test]
    fn test_event_serialization() {
        let error = SessionError::ActivationRejected("busy".to_string());
        let event = SessionEvent::ReactivationFailed {
            kind: error.kind(),
            error: error.to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "ReactivationFailed");
        assert_eq!(json["data"]["kind"], "activation_rejected");
    }
}
