//! Domain Layer - 领域层
//!
//! - voice: 音色目录（说话人 → 参考音频规格）
//! - audio: 音频缓冲区、重采样与变调
//! - naming: 生成文件/临时文件命名规则
//! - text: 合成前文本清理

pub mod audio;
pub mod naming;
pub mod text;
pub mod voice;

pub use audio::AudioBuffer;
pub use naming::name_for;
pub use text::{normalize, NormalizedText};
pub use voice::{SourceKind, VoiceCatalog, VoiceSpec};
