//! 应用层 - 查询（读操作）

mod voice_queries;

pub mod handlers;

pub use voice_queries::*;
