//! Storage Adapter - 文件系统清理

mod retention;

pub use retention::FileRetentionManager;
