//! Text Normalizer - 合成前的文本清理

/// 截断后追加的标记
pub const TRUNCATION_MARKER: &str = "...";

/// 清理后的文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub text: String,
    /// 截断前的字符数（未截断时为 None）
    pub truncated_from: Option<usize>,
}

impl NormalizedText {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// 去掉 markdown 强调符号（`**` / `*`），超过 `max_chars` 个字符时截断并追加 `...`
pub fn normalize(raw: &str, max_chars: usize) -> NormalizedText {
    let cleaned: String = raw.chars().filter(|&c| c != '*').collect();
    let char_count = cleaned.chars().count();

    if char_count <= max_chars {
        return NormalizedText {
            text: cleaned,
            truncated_from: None,
        };
    }

    let mut text: String = cleaned.chars().take(max_chars).collect();
    text.push_str(TRUNCATION_MARKER);

    NormalizedText {
        text,
        truncated_from: Some(char_count),
    }
}
