//! Retention Port - 生成文件与临时文件的清理

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// 清理结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// 超龄删除的生成文件数
    pub deleted_artifacts: u64,
    /// 删除的临时变调文件数
    pub deleted_transients: u64,
    /// 删除失败的文件数（已记录日志）
    pub failed: u64,
}

impl SweepReport {
    /// 删除的文件总数
    pub fn deleted(&self) -> u64 {
        self.deleted_artifacts + self.deleted_transients
    }
}

/// Retention Port
///
/// IO 错误只记录日志，不向调用方传播
#[async_trait]
pub trait RetentionPort: Send + Sync {
    /// 删除超过 `max_age` 的生成文件，以及所有未被占用的临时变调文件
    async fn sweep(&self, max_age: Duration) -> SweepReport;
}
