//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use std::path::PathBuf;
use thiserror::Error;

use crate::application::ports::{CodecError, SynthesisError};
use crate::domain::audio::PitchShiftError;

/// 引擎错误
#[derive(Debug, Error)]
pub enum EngineError {
    /// 基础音色缺失：所有需要回退的说话人都无法服务
    #[error("Base voice not found at {}", .path.display())]
    MissingBaseVoice { path: PathBuf },

    /// 参考音频解码/编码失败
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// 外部合成器失败（不重试）
    #[error("Synthesis failed for speaker '{speaker}' ({text_len} chars): {source}")]
    SynthesisFailed {
        speaker: String,
        text_len: usize,
        #[source]
        source: SynthesisError,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    Validation(String),

    /// 文件系统错误
    #[error("IO error: {0}")]
    Io(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// 是否为不可恢复的配置问题
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingBaseVoice { .. })
    }
}

impl From<PitchShiftError> for EngineError {
    fn from(err: PitchShiftError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("Blocking task failed: {}", err))
    }
}
