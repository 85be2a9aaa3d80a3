//! Voice Queries

/// 列出目录中所有音色及其文件状态
#[derive(Debug, Clone, Default)]
pub struct ListVoices;

/// 服务健康状态查询
#[derive(Debug, Clone, Default)]
pub struct GetHealth;
