//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 合成器配置
    #[serde(default)]
    pub synth: SynthConfig,

    /// 音色目录配置
    #[serde(default)]
    pub voices: VoicesConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 生成参数
    #[serde(default)]
    pub generation: GenerationConfig,

    /// 清理配置
    #[serde(default)]
    pub retention: RetentionConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 合成器后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthBackend {
    /// 远程声音克隆服务
    #[default]
    Http,
    /// 回显参考音频，不做合成
    Fake,
}

/// 合成器配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthConfig {
    #[serde(default)]
    pub backend: SynthBackend,

    /// 合成服务基础 URL
    #[serde(default = "default_synth_url")]
    pub url: String,

    /// 请求超时时间（秒），CPU 推理较慢
    #[serde(default = "default_synth_timeout")]
    pub timeout_secs: u64,

    /// 合成语言
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_synth_url() -> String {
    "http://localhost:5002".to_string()
}

fn default_synth_timeout() -> u64 {
    300
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            backend: SynthBackend::default(),
            url: default_synth_url(),
            timeout_secs: default_synth_timeout(),
            language: default_language(),
        }
    }
}

/// 单个音色条目
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VoiceEntry {
    pub name: String,
    /// 参考音频路径
    pub clip: PathBuf,
    /// 参考缺失时对基础音色施加的半音数
    #[serde(default)]
    pub pitch_shift: i32,
}

impl VoiceEntry {
    fn new(name: &str, clip: &str, pitch_shift: i32) -> Self {
        Self {
            name: name.to_string(),
            clip: PathBuf::from(clip),
            pitch_shift,
        }
    }
}

/// 音色目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct VoicesConfig {
    /// 基础音色（default 条目使用它，缺失参考的音色由它变调得到）
    #[serde(default = "default_base_clip")]
    pub base_clip: PathBuf,

    /// 音色表，未配置时使用内置的历史人物表
    #[serde(default = "default_voice_entries")]
    pub entries: Vec<VoiceEntry>,
}

fn default_base_clip() -> PathBuf {
    PathBuf::from("./kenny.wav")
}

fn default_voice_entries() -> Vec<VoiceEntry> {
    vec![
        VoiceEntry::new("John F. Kennedy", "./kenny.wav", 0),
        VoiceEntry::new("Abraham Lincoln", "./voices/lincoln.wav", -2),
        VoiceEntry::new("Albert Einstein", "./voices/einstein.wav", 1),
        VoiceEntry::new("Marie Curie", "./voices/curie.wav", 4),
        VoiceEntry::new("Leonardo da Vinci", "./voices/davinci.wav", 0),
        VoiceEntry::new("Cleopatra", "./voices/cleopatra.wav", 5),
        VoiceEntry::new("William Shakespeare", "./voices/shakespeare.wav", -1),
        VoiceEntry::new("Julius Caesar", "./voices/caesar.wav", -2),
        VoiceEntry::new("Joan of Arc", "./voices/joanofarc.wav", 3),
        VoiceEntry::new("Galileo Galilei", "./voices/galileo.wav", 1),
        VoiceEntry::new("Queen Elizabeth I", "./voices/elizabeth.wav", 4),
    ]
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            base_clip: default_base_clip(),
            entries: default_voice_entries(),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 生成文件目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./audio_outputs")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// 生成参数
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// 文本最大字符数，超出截断
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    /// 参考音频短于该时长（秒）时记录警告
    #[serde(default = "default_min_reference_secs")]
    pub min_reference_secs: f64,
}

fn default_max_text_chars() -> usize {
    500
}

fn default_min_reference_secs() -> f64 {
    6.0
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_text_chars: default_max_text_chars(),
            min_reference_secs: default_min_reference_secs(),
        }
    }
}

/// 清理配置
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    /// 是否启用后台定期清理
    #[serde(default = "default_retention_enabled")]
    pub enabled: bool,

    /// 清理间隔（秒）
    #[serde(default = "default_retention_interval")]
    pub interval_secs: u64,

    /// 生成文件保留时长（秒）
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

fn default_retention_enabled() -> bool {
    true
}

fn default_retention_interval() -> u64 {
    3600 // 1 小时
}

fn default_max_age() -> u64 {
    86400 // 24 小时
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: default_retention_enabled(),
            interval_secs: default_retention_interval(),
            max_age_secs: default_max_age(),
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
