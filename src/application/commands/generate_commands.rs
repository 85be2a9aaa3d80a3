//! Generate Commands

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::domain::voice::SourceKind;

/// 生成语音命令
#[derive(Debug, Clone)]
pub struct GenerateSpeech {
    pub speaker: String,
    pub text: String,
}

/// 生成结果
///
/// 同一 (speaker, 清理后文本) 的 id 和 path 总是相同，重复请求覆盖同一文件
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedArtifact {
    /// 文件名去掉扩展名
    pub id: String,
    pub path: PathBuf,
    pub speaker: String,
    pub created_at: DateTime<Utc>,
    pub pitch_shift_applied: i32,
    pub generation_duration_secs: f64,
    pub source_kind: SourceKind,
    /// 清理后文本的字符数
    pub text_length: usize,
    pub reference_warning: Option<String>,
}
