//! Session Context - Value Objects

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// 音频会话类别
///
/// 声明进程使用音频的意图。默认配置固定为 `Playback`（持续输出音频，而非提示音）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionCategory {
    /// 背景音效，可与其他音频混合，随静音开关静音
    Ambient,
    /// 独占的背景音效，随静音开关静音
    SoloAmbient,
    /// 持续播放
    #[default]
    Playback,
    /// 同时录音与播放
    PlayAndRecord,
}

impl SessionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionCategory::Ambient => "ambient",
            SessionCategory::SoloAmbient => "solo_ambient",
            SessionCategory::Playback => "playback",
            SessionCategory::PlayAndRecord => "play_and_record",
        }
    }

    /// 该类别是否在静音开关打开时仍可出声
    pub fn plays_in_silent_mode(&self) -> bool {
        matches!(
            self,
            SessionCategory::Playback | SessionCategory::PlayAndRecord
        )
    }
}

impl std::fmt::Display for SessionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 音频会话模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    #[default]
    Default,
    SpokenAudio,
    MoviePlayback,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Default => "default",
            SessionMode::SpokenAudio => "spoken_audio",
            SessionMode::MoviePlayback => "movie_playback",
        }
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// 混音与输出路由策略
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MixingPolicy: u32 {
        /// 与其他应用的音频混合，而不是打断它们
        const MIX_WITH_OTHERS = 1 << 0;
        /// 允许 AirPlay 输出
        const ALLOW_AIRPLAY = 1 << 1;
        /// 允许蓝牙（免提）输出
        const ALLOW_BLUETOOTH = 1 << 2;
        /// 允许高质量蓝牙（A2DP）输出
        const ALLOW_BLUETOOTH_A2DP = 1 << 3;
        /// 没有其他路由请求时默认使用扬声器
        const DEFAULT_TO_SPEAKER = 1 << 4;
    }
}

impl Default for MixingPolicy {
    fn default() -> Self {
        MixingPolicy::all()
    }
}

/// 单个混音选项（配置文件中的列表项）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixingOption {
    MixWithOthers,
    AllowAirplay,
    AllowBluetooth,
    AllowBluetoothA2dp,
    DefaultToSpeaker,
}

impl MixingOption {
    pub const ALL: [MixingOption; 5] = [
        MixingOption::MixWithOthers,
        MixingOption::AllowAirplay,
        MixingOption::AllowBluetooth,
        MixingOption::AllowBluetoothA2dp,
        MixingOption::DefaultToSpeaker,
    ];

    pub fn flag(&self) -> MixingPolicy {
        match self {
            MixingOption::MixWithOthers => MixingPolicy::MIX_WITH_OTHERS,
            MixingOption::AllowAirplay => MixingPolicy::ALLOW_AIRPLAY,
            MixingOption::AllowBluetooth => MixingPolicy::ALLOW_BLUETOOTH,
            MixingOption::AllowBluetoothA2dp => MixingPolicy::ALLOW_BLUETOOTH_A2DP,
            MixingOption::DefaultToSpeaker => MixingPolicy::DEFAULT_TO_SPEAKER,
        }
    }
}

impl FromIterator<MixingOption> for MixingPolicy {
    fn from_iter<I: IntoIterator<Item = MixingOption>>(iter: I) -> Self {
        iter.into_iter()
            .fold(MixingPolicy::empty(), |policy, option| policy | option.flag())
    }
}

/// 激活/停用请求附带的选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationOptions {
    /// 停用时通知其他进程可以恢复播放
    pub notify_others_on_deactivation: bool,
}

impl Default for ActivationOptions {
    fn default() -> Self {
        Self {
            notify_others_on_deactivation: true,
        }
    }
}

/// 音频会话配置
///
/// 启动时创建一次，之后不可变。中断恢复时复用最后一次成功激活的配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    category: SessionCategory,
    mode: SessionMode,
    mixing_policy: MixingPolicy,
    allow_playback_in_silent_mode: bool,
    activation_options: ActivationOptions,
}

impl SessionConfig {
    /// 标准播放配置：Playback 类别，全部混音选项，静音模式下可播放
    pub fn playback() -> Self {
        Self {
            category: SessionCategory::Playback,
            mode: SessionMode::Default,
            mixing_policy: MixingPolicy::default(),
            allow_playback_in_silent_mode: true,
            activation_options: ActivationOptions::default(),
        }
    }

    pub fn new(
        category: SessionCategory,
        mode: SessionMode,
        mixing_policy: MixingPolicy,
        activation_options: ActivationOptions,
    ) -> Self {
        Self {
            category,
            mode,
            mixing_policy,
            allow_playback_in_silent_mode: category.plays_in_silent_mode(),
            activation_options,
        }
    }

    pub fn with_mixing_policy(mut self, mixing_policy: MixingPolicy) -> Self {
        self.mixing_policy = mixing_policy;
        self
    }

    /// 静音模式下是否播放，只在类别支持时生效
    pub fn with_playback_in_silent_mode(mut self, allow: bool) -> Self {
        self.allow_playback_in_silent_mode = allow && self.category.plays_in_silent_mode();
        self
    }

    // Getters
    pub fn category(&self) -> SessionCategory {
        self.category
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn mixing_policy(&self) -> MixingPolicy {
        self.mixing_policy
    }

    pub fn allow_playback_in_silent_mode(&self) -> bool {
        self.allow_playback_in_silent_mode
    }

    pub fn activation_options(&self) -> ActivationOptions {
        self.activation_options
    }

    /// 是否会压低或打断其他应用的音频
    pub fn interrupts_others(&self) -> bool {
        !self.mixing_policy.contains(MixingPolicy::MIX_WITH_OTHERS)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::playback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_config() {
        let config = SessionConfig::playback();
        assert_eq!(config.category(), SessionCategory::Playback);
        assert_eq!(config.mode(), SessionMode::Default);
        assert!(config.allow_playback_in_silent_mode());
        assert!(config.mixing_policy().contains(MixingPolicy::MIX_WITH_OTHERS));
        assert!(config.mixing_policy().contains(MixingPolicy::ALLOW_BLUETOOTH_A2DP));
        assert!(config.activation_options().notify_others_on_deactivation);
        assert!(!config.interrupts_others());
    }

    #[test]
    fn test_policy_from_options() {
        let policy: MixingPolicy = [MixingOption::AllowAirplay, MixingOption::DefaultToSpeaker]
            .into_iter()
            .collect();
        assert_eq!(
            policy,
            MixingPolicy::ALLOW_AIRPLAY | MixingPolicy::DEFAULT_TO_SPEAKER
        );

        let all: MixingPolicy = MixingOption::ALL.into_iter().collect();
        assert_eq!(all, MixingPolicy::all());
    }

    #[test]
    fn test_silent_mode_follows_category() {
        let config = SessionConfig::new(
            SessionCategory::Ambient,
            SessionMode::Default,
            MixingPolicy::empty(),
            ActivationOptions::default(),
        );
        assert!(!config.allow_playback_in_silent_mode());
        assert!(config.interrupts_others());
    }
}
