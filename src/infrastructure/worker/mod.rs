//! Worker Layer - 后台任务
//!
//! 实现 RetentionWorker，定期清理过期生成文件和遗留的临时文件

mod retention_worker;

pub use retention_worker::{RetentionWorker, RetentionWorkerConfig};
