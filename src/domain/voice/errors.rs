//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("音色名称重复: {0}")]
    DuplicateName(String),

    #[error("音色目录缺少 default 条目")]
    MissingDefault,

    #[error("default 音色的音调偏移必须为 0，实际为 {0}")]
    ShiftedDefault(i32),

    #[error("无效的音色名称: {0}")]
    InvalidName(String),

    #[error("音色 {name} 的音调偏移超出范围: {semitones}")]
    ShiftOutOfRange { name: String, semitones: i32 },
}
