//! Synthesizer Port - 外部声音克隆模型抽象
//!
//! 引擎本身不做语音合成，只负责准备参考音频并把请求交给外部合成器

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::domain::audio::AudioBuffer;

/// 合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// 合成请求
///
/// 同时提供参考音频的内存缓冲区和磁盘路径，由具体实现决定使用哪一个
#[derive(Debug, Clone, Copy)]
pub struct SynthesisRequest<'a> {
    /// 已清理的文本
    pub text: &'a str,
    /// 参考音频文件（原始、基础或临时变调文件）
    pub reference_path: &'a Path,
    /// 参考音频样本
    pub reference: &'a AudioBuffer,
    /// 语言代码
    pub language: &'a str,
    /// 输出文件路径，已存在则覆盖
    pub output_path: &'a Path,
}

/// Synthesizer Port
#[async_trait]
pub trait SynthesizerPort: Send + Sync {
    /// 合成语音并写入 `request.output_path`
    async fn synthesize(&self, request: SynthesisRequest<'_>) -> Result<(), SynthesisError>;

    /// 检查合成器是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
