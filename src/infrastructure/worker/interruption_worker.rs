//! Interruption Worker - 中断通知的后台处理
//!
//! 平台在自己的投递上下文中调用 `InterruptionSink::post`，通知进入有界队列，
//! 由 Worker 按顺序交给 AudioSessionManager 处理。投递方从不阻塞

use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::application::session_manager::AudioSessionManager;
use crate::domain::session::InterruptionPayload;

/// 创建中断通知队列
pub fn interruption_channel(
    capacity: usize,
) -> (InterruptionSink, mpsc::Receiver<InterruptionPayload>) {
    let (tx, rx) = mpsc::channel(capacity);
    (InterruptionSink { sender: tx }, rx)
}

/// 中断通知投递端（平台侧持有）
#[derive(Debug, Clone)]
pub struct InterruptionSink {
    sender: mpsc::Sender<InterruptionPayload>,
}

impl InterruptionSink {
    /// 投递通知，队列已满或已关闭时丢弃并返回 false
    pub fn post(&self, payload: InterruptionPayload) -> bool {
        match self.sender.try_send(payload) {
            Ok(()) => true,
            Err(TrySendError::Full(payload)) => {
                tracing::warn!(
                    payload = ?payload.fields(),
                    "Interruption queue full, notification dropped"
                );
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::warn!("Interruption queue closed, notification dropped");
                false
            }
        }
    }
}

/// 中断 Worker
pub struct InterruptionWorker {
    queue_receiver: mpsc::Receiver<InterruptionPayload>,
    session_manager: Arc<AudioSessionManager>,
}

impl InterruptionWorker {
    pub fn new(
        queue_receiver: mpsc::Receiver<InterruptionPayload>,
        session_manager: Arc<AudioSessionManager>,
    ) -> Self {
        Self {
            queue_receiver,
            session_manager,
        }
    }

    /// 启动 Worker，所有投递端关闭后退出
    pub async fn run(mut self) {
        tracing::info!("InterruptionWorker started");

        let mut handled: u64 = 0;
        while let Some(payload) = self.queue_receiver.recv().await {
            self.session_manager.handle_interruption(&payload).await;
            handled += 1;
        }

        tracing::info!(handled = handled, "InterruptionWorker stopped");
    }
}
