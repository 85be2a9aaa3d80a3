//! Output Naming - 生成文件与临时变调文件的命名规则
//!
//! - 生成文件: `voice_<speaker_slug>_<md5前8位>.wav`
//! - 临时变调文件: `<基础音频文件名>_shifted_<半音数>.wav`，与基础音频同目录

use std::path::{Path, PathBuf};

/// 生成文件名前缀
pub const ARTIFACT_PREFIX: &str = "voice_";

/// 临时变调文件名标记
pub const TRANSIENT_MARKER: &str = "_shifted_";

const WAV_EXTENSION: &str = "wav";
const HASH_WIDTH: usize = 8;
const MAX_SLUG_CHARS: usize = 64;

/// 计算生成文件名
///
/// 相同的 (speaker, normalized_text) 总是得到相同的文件名，重复请求会覆盖同一文件
pub fn name_for(speaker: &str, normalized_text: &str) -> String {
    let digest = md5::compute(format!("{}:{}", speaker, normalized_text).as_bytes());
    let hash = format!("{:x}", digest);
    format!(
        "{}{}_{}.{}",
        ARTIFACT_PREFIX,
        speaker_slug(speaker),
        &hash[..HASH_WIDTH],
        WAV_EXTENSION
    )
}

/// 说话人名称转为安全的文件名片段
///
/// 空格替换为下划线，去掉路径不安全字符
pub fn speaker_slug(speaker: &str) -> String {
    let slug: String = speaker
        .trim()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') => Some(c),
            _ => None,
        })
        .take(MAX_SLUG_CHARS)
        .collect();

    let slug = slug.trim_start_matches('.');
    if slug.is_empty() {
        "speaker".to_string()
    } else {
        slug.to_string()
    }
}

/// 基础音频变调后的临时文件路径
pub fn transient_path(base_clip: &Path, semitones: i32) -> PathBuf {
    let stem = base_clip
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("reference");
    base_clip.with_file_name(format!(
        "{}{}{}.{}",
        stem, TRANSIENT_MARKER, semitones, WAV_EXTENSION
    ))
}

/// 是否符合生成文件命名
pub fn is_artifact_file(path: &Path) -> bool {
    file_name_of(path).map_or(false, |name| {
        name.starts_with(ARTIFACT_PREFIX) && has_wav_extension(path)
    })
}

/// 临时变调文件所在目录（基础音频的父目录，没有时为当前目录）
pub fn transient_dir(base_clip: &Path) -> PathBuf {
    match base_clip.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// 是否为该基础音频的临时变调文件: `<基础音频文件名>_shifted_<整数>.wav`
pub fn is_transient_of(base_clip: &Path, path: &Path) -> bool {
    let Some(base_stem) = base_clip.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|stem| stem.strip_prefix(base_stem))
        .and_then(|rest| rest.strip_prefix(TRANSIENT_MARKER))
        .map_or(false, |n| {
            !n.starts_with('+') && n.parse::<i32>().is_ok()
        })
        && has_wav_extension(path)
}

fn file_name_of(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

fn has_wav_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case(WAV_EXTENSION))
}
