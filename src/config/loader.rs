//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, SynthBackend};
use crate::domain::voice::MAX_PITCH_SHIFT;

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
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOXREF_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VOXREF_SERVER__PORT=8080`
/// - `VOXREF_SYNTH__URL=http://xtts:5002`
/// - `VOXREF_SYNTH__BACKEND=fake`
/// - `VOXREF_VOICES__BASE_CLIP=/data/kenny.wav`
/// - `VOXREF_RETENTION__MAX_AGE_SECS=3600`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级），音色表的默认值由 serde 提供
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("synth.backend", "http")?
        .set_default("synth.url", "http://localhost:5002")?
        .set_default("synth.timeout_secs", 300)?
        .set_default("synth.language", "en")?
        .set_default("voices.base_clip", "./kenny.wav")?
        .set_default("storage.output_dir", "./audio_outputs")?
        .set_default("generation.max_text_chars", 500)?
        .set_default("generation.min_reference_secs", 6.0)?
        .set_default("retention.enabled", true)?
        .set_default("retention.interval_secs", 3600)?
        .set_default("retention.max_age_secs", 86400)?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级），例如 VOXREF_SYNTH__URL=http://xtts:5002
    builder = builder.add_source(
        Environment::with_prefix("VOXREF")
            .prefix_separator("_")
            .separator("__")
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
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.synth.backend == SynthBackend::Http && config.synth.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Synth URL cannot be empty for the http backend".to_string(),
        ));
    }

    if config.voices.base_clip.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Base voice clip path cannot be empty".to_string(),
        ));
    }

    if let Some(entry) = config
        .voices
        .entries
        .iter()
        .find(|e| e.pitch_shift.abs() > MAX_PITCH_SHIFT)
    {
        return Err(ConfigError::ValidationError(format!(
            "Pitch shift for '{}' must be within ±{} semitones, got {}",
            entry.name, MAX_PITCH_SHIFT, entry.pitch_shift
        )));
    }

    if config.generation.max_text_chars == 0 {
        return Err(ConfigError::ValidationError(
            "Max text chars must be greater than 0".to_string(),
        ));
    }

    let min_secs = config.generation.min_reference_secs;
    if min_secs.is_nan() || min_secs < 0.0 {
        return Err(ConfigError::ValidationError(
            "Min reference duration cannot be negative".to_string(),
        ));
    }

    if config.retention.enabled && config.retention.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Retention interval cannot be 0 when retention is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Synth Backend: {:?}", config.synth.backend);
    if config.synth.backend == SynthBackend::Http {
        tracing::info!("Synth URL: {}", config.synth.url);
        tracing::info!("Synth Timeout: {}s", config.synth.timeout_secs);
    }
    tracing::info!("Language: {}", config.synth.language);
    tracing::info!("Base Voice: {:?}", config.voices.base_clip);
    tracing::info!("Voices Configured: {}", config.voices.entries.len());
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Max Text Chars: {}", config.generation.max_text_chars);
    tracing::info!("Retention Enabled: {}", config.retention.enabled);
    if config.retention.enabled {
        tracing::info!("Retention Interval: {}s", config.retention.interval_secs);
        tracing::info!("Retention Max Age: {}s", config.retention.max_age_secs);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
