//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

use crate::application::session_manager::SessionManagerConfig;
use crate::domain::session::{
    ActivationOptions, MixingOption, MixingPolicy, SessionCategory, SessionConfig, SessionMode,
};
use crate::infrastructure::adapters::platform::SimulatedPlatformConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 音频会话配置
    #[serde(default)]
    pub session: SessionSettings,

    /// 平台配置
    #[serde(default)]
    pub platform: PlatformSettings,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 音频会话配置
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// 会话类别
    /// 可选: ambient, solo_ambient, playback, play_and_record
    #[serde(default)]
    pub category: SessionCategory,

    /// 会话模式
    /// 可选: default, spoken_audio, movie_playback
    #[serde(default)]
    pub mode: SessionMode,

    /// 混音选项
    /// 可选: mix_with_others, allow_airplay, allow_bluetooth, allow_bluetooth_a2dp, default_to_speaker
    #[serde(default = "default_options")]
    pub options: Vec<MixingOption>,

    /// 静音模式下是否允许播放（需要类别支持）
    #[serde(default = "default_true")]
    pub allow_playback_in_silent_mode: bool,

    /// 停用时通知其他进程恢复播放
    #[serde(default = "default_true")]
    pub notify_others_on_deactivation: bool,

    /// 单次平台请求超时（毫秒）
    #[serde(default = "default_activation_timeout")]
    pub activation_timeout_ms: u64,
}

fn default_options() -> Vec<MixingOption> {
    MixingOption::ALL.to_vec()
}

fn default_true() -> bool {
    true
}

fn default_activation_timeout() -> u64 {
    2000
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            category: SessionCategory::default(),
            mode: SessionMode::default(),
            options: default_options(),
            allow_playback_in_silent_mode: true,
            notify_others_on_deactivation: true,
            activation_timeout_ms: default_activation_timeout(),
        }
    }
}

impl SessionSettings {
    /// 混音策略
    pub fn mixing_policy(&self) -> MixingPolicy {
        self.options.iter().copied().collect()
    }

    /// 构建会话配置
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(
            self.category,
            self.mode,
            self.mixing_policy(),
            ActivationOptions {
                notify_others_on_deactivation: self.notify_others_on_deactivation,
            },
        )
        .with_playback_in_silent_mode(self.allow_playback_in_silent_mode)
    }

    /// 构建 Manager 配置
    pub fn manager_config(&self) -> SessionManagerConfig {
        SessionManagerConfig {
            request_timeout: Duration::from_millis(self.activation_timeout_ms),
        }
    }
}

/// 平台配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformSettings {
    /// 中断通知队列容量
    #[serde(default = "default_queue_capacity")]
    pub interruption_queue_capacity: usize,

    /// 模拟平台的请求延迟（毫秒）
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

fn default_queue_capacity() -> usize {
    64
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            interruption_queue_capacity: default_queue_capacity(),
            simulated_latency_ms: 0,
        }
    }
}

impl PlatformSettings {
    pub fn simulated_config(&self) -> SimulatedPlatformConfig {
        SimulatedPlatformConfig {
            latency_ms: self.simulated_latency_ms,
            ..Default::default()
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.session.category, SessionCategory::Playback);
        assert_eq!(config.session.options.len(), 5);
        assert_eq!(config.platform.interruption_queue_capacity, 64);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_default_session_config_is_playback() {
        let config = SessionSettings::default().session_config();
        assert_eq!(config, SessionConfig::playback());
    }

    #[test]
    fn test_manager_config() {
        let settings = SessionSettings {
            activation_timeout_ms: 350,
            ..Default::default()
        };
        assert_eq!(
            settings.manager_config().request_timeout,
            Duration::from_millis(350)
        );
    }
}
