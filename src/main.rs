//! AudioSession - 宿主应用生命周期
//!
//! 启动时激活音频会话，运行期间处理中断通知，退出时停用会话:
//! - Config: 环境变量 > 配置文件 > 默认值
//! - Platform: SimulatedAudioPlatform
//! - Worker: InterruptionWorker

use std::sync::Arc;

use audiosession::config::{load_config, print_config};
use audiosession::infrastructure::adapters::SimulatedAudioPlatform;
use audiosession::infrastructure::events::SessionEventPublisher;
use audiosession::infrastructure::worker::{interruption_channel, InterruptionWorker};
use audiosession::AudioSessionManager;
use tokio::sync::broadcast::error::RecvError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},audiosession={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("AudioSession - 音频会话生命周期管理");
    print_config(&config);

    // 创建中断通知队列
    let (interruption_sink, interruption_rx) =
        interruption_channel(config.platform.interruption_queue_capacity);

    // 创建平台适配器
    let platform = Arc::new(
        SimulatedAudioPlatform::new(config.platform.simulated_config())
            .with_interruption_sink(interruption_sink),
    );

    // 创建事件发布器
    let event_publisher = SessionEventPublisher::new().arc();

    let session_manager = AudioSessionManager::new(
        config.session.manager_config(),
        platform.clone(),
        event_publisher.clone(),
    )
    .arc();

    // 记录会话事件
    let mut events = event_publisher.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => tracing::debug!(event = ?event, "Session event"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped = skipped, "Session event listener lagged")
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // 启动 Worker
    tokio::spawn(InterruptionWorker::new(interruption_rx, session_manager.clone()).run());

    // 激活失败不影响宿主继续运行
    if let Err(e) = session_manager
        .activate(config.session.session_config())
        .await
    {
        tracing::error!(error = %e, "Failed to set up audio session");
    }

    tracing::info!(phase = session_manager.phase().as_str(), "Audio session ready");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Received shutdown signal");

    if let Err(e) = session_manager.deactivate().await {
        tracing::warn!(error = %e, "Failed to deactivate audio session");
    }

    tracing::info!("Shutdown complete");

    Ok(())
}
