//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 基础音色在目录中的保留名称
pub const DEFAULT_VOICE: &str = "default";

/// 允许的音调偏移范围（半音）
pub const MAX_PITCH_SHIFT: i32 = 12;

/// 音色规格 - 说话人名称到参考音频的映射
///
/// 不变量:
/// - name 在目录内唯一
/// - 构建完成后不可修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceSpec {
    name: String,
    clip_path: PathBuf,
    pitch_shift_semitones: i32,
}

impl VoiceSpec {
    pub fn new(name: impl Into<String>, clip_path: impl Into<PathBuf>, pitch_shift_semitones: i32) -> Self {
        Self {
            name: name.into(),
            clip_path: clip_path.into(),
            pitch_shift_semitones,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn clip_path(&self) -> &Path {
        &self.clip_path
    }

    pub fn pitch_shift_semitones(&self) -> i32 {
        self.pitch_shift_semitones
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_VOICE
    }
}

/// 参考音频来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// 说话人自己的参考音频
    Original,
    /// 由基础音色（可能经过变调）合成
    SyntheticFromBase,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::SyntheticFromBase => "synthetic",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
