//! voxref - 声音参考解析与变调回退引擎
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 说话人到参考音频的映射
//! - Audio: 单声道缓冲区、FFT 重采样、变调
//! - 文本清理与输出文件命名
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Synthesizer, AudioCodec, Retention）
//! - ReferenceResolver: 参考音频解析与临时变调文件
//! - Commands / Queries: 生成、清理、音色列表、健康检查
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Worker: RetentionWorker 定期清理
//! - Adapters: WAV 编解码、合成服务客户端、文件系统清理

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
