//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（audiosession.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["audiosession", "audiosession.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `AUDIOSESSION_`，层级分隔符 `__`）
/// 2. 配置文件（audiosession.toml 或 audiosession.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `AUDIOSESSION_SESSION__CATEGORY=playback`
/// - `AUDIOSESSION_SESSION__OPTIONS=mix_with_others,allow_airplay`
/// - `AUDIOSESSION_SESSION__ACTIVATION_TIMEOUT_MS=500`
/// - `AUDIOSESSION_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("session.category", "playback")?
        .set_default("session.mode", "default")?
        .set_default("session.allow_playback_in_silent_mode", true)?
        .set_default("session.notify_others_on_deactivation", true)?
        .set_default("session.activation_timeout_ms", 2000)?
        .set_default("platform.interruption_queue_capacity", 64)?
        .set_default("platform.simulated_latency_ms", 0)?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: AUDIOSESSION_SESSION__ACTIVATION_TIMEOUT_MS=500
    // 混音选项用逗号分隔
    builder = builder.add_source(
        Environment::with_prefix("AUDIOSESSION")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("session.options")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.session.activation_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "Activation timeout cannot be 0".to_string(),
        ));
    }

    if config.session.allow_playback_in_silent_mode
        && !config.session.category.plays_in_silent_mode()
    {
        return Err(ConfigError::ValidationError(format!(
            "Category {} cannot play in silent mode",
            config.session.category
        )));
    }

    if config.platform.interruption_queue_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "Interruption queue capacity cannot be 0".to_string(),
        ));
    }

    if config.log.level.is_empty() {
        return Err(ConfigError::ValidationError(
            "Log level cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Audio Session Configuration ===");
    tracing::info!("Category: {}", config.session.category);
    tracing::info!("Mode: {}", config.session.mode);
    tracing::info!("Mixing Policy: {:?}", config.session.mixing_policy());
    tracing::info!(
        "Playback In Silent Mode: {}",
        config.session.allow_playback_in_silent_mode
    );
    tracing::info!(
        "Notify Others On Deactivation: {}",
        config.session.notify_others_on_deactivation
    );
    tracing::info!("Activation Timeout: {}ms", config.session.activation_timeout_ms);
    tracing::info!(
        "Interruption Queue Capacity: {}",
        config.platform.interruption_queue_capacity
    );
    if config.platform.simulated_latency_ms > 0 {
        tracing::info!(
            "Simulated Platform Latency: {}ms",
            config.platform.simulated_latency_ms
        );
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("===================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::{MixingPolicy, SessionCategory, SessionMode};
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_validation_passes_for_default_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.session.activation_timeout_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_silent_mode_category() {
        let mut config = AppConfig::default();
        config.session.category = SessionCategory::Ambient;
        assert!(validate_config(&config).is_err());

        config.session.allow_playback_in_silent_mode = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_queue_capacity() {
        let mut config = AppConfig::default();
        config.platform.interruption_queue_capacity = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(
            r#"
[session]
mode = "spoken_audio"
options = ["allow_airplay", "default_to_speaker"]
activation_timeout_ms = 500

[platform]
interruption_queue_capacity = 8
"#,
        );

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.session.category, SessionCategory::Playback);
        assert_eq!(config.session.mode, SessionMode::SpokenAudio);
        assert_eq!(
            config.session.mixing_policy(),
            MixingPolicy::ALLOW_AIRPLAY | MixingPolicy::DEFAULT_TO_SPEAKER
        );
        assert_eq!(config.session.activation_timeout_ms, 500);
        assert_eq!(config.platform.interruption_queue_capacity, 8);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_load_rejects_unknown_category() {
        let file = write_config("[session]\ncategory = \"karaoke\"\n");
        assert!(matches!(
            load_config_from_path(Some(file.path())),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_config_from_path(Some(Path::new("/nonexistent/audiosession.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
