//! Retention Commands

use std::time::Duration;

/// 清理过期文件命令
#[derive(Debug, Clone, Default)]
pub struct SweepArtifacts {
    /// 未指定时使用配置的保留时长
    pub max_age: Option<Duration>,
}
