//! Audio Codec Port - 参考音频读写
//!
//! 解码任意支持的音频文件为单声道 AudioBuffer，编码为 WAV 文件

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::audio::AudioBuffer;

/// 编解码错误
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Failed to decode {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to encode {}: {reason}", .path.display())]
    Encode { path: PathBuf, reason: String },
}

impl CodecError {
    pub fn decode(path: &Path, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn encode(path: &Path, reason: impl ToString) -> Self {
        Self::Encode {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// Audio Codec Port
#[async_trait]
pub trait AudioCodecPort: Send + Sync {
    /// 读取并解码音频文件（多声道取平均混为单声道）
    async fn decode(&self, path: &Path) -> Result<AudioBuffer, CodecError>;

    /// 以缓冲区自身采样率写出 WAV 文件，已存在则覆盖
    async fn encode(&self, buffer: &AudioBuffer, path: &Path) -> Result<(), CodecError>;
}
