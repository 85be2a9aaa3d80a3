//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Synthesizer、AudioCodec、Retention）
//! - resolver: 说话人 → 参考音频解析（含变调回退）
//! - leases: 临时变调文件的路径级互斥
//! - commands: 生成与清理命令及处理器
//! - queries: 音色列表与健康检查
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod leases;
pub mod ports;
pub mod queries;
pub mod resolver;

// Re-exports
pub use commands::{
    handlers::{GenerateSpeechHandler, GenerationSettings, SweepArtifactsHandler},
    GenerateSpeech, GeneratedArtifact, SweepArtifacts,
};

pub use error::EngineError;
pub use leases::{TransientLease, TransientLeases};

pub use ports::{
    AudioCodecPort, CodecError, RetentionPort, SweepReport, SynthesisError, SynthesisRequest,
    SynthesizerPort,
};

pub use queries::{
    handlers::{HealthHandler, HealthResponse, ListVoicesHandler, VoiceListResponse, VoiceStatus},
    GetHealth, ListVoices,
};

pub use resolver::{ReferenceResolver, ReferenceWarning, ResolvedReference, TransientFile};
