//! Voice Context - Catalog
//!
//! 进程级只读音色目录，启动时构建一次

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{CatalogError, VoiceSpec, DEFAULT_VOICE, MAX_PITCH_SHIFT};

/// 音色目录
///
/// 不变量:
/// - 名称唯一
/// - 有且仅有一个 default 条目，且其音调偏移为 0
#[derive(Debug, Clone)]
pub struct VoiceCatalog {
    voices: Vec<VoiceSpec>,
    index: HashMap<String, usize>,
    default_index: usize,
}

impl VoiceCatalog {
    /// 从完整条目列表构建（必须包含 default）
    pub fn new(voices: Vec<VoiceSpec>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(voices.len());

        for (i, voice) in voices.iter().enumerate() {
            if voice.name().trim().is_empty() {
                return Err(CatalogError::InvalidName(voice.name().to_string()));
            }
            if voice.pitch_shift_semitones().abs() > MAX_PITCH_SHIFT {
                return Err(CatalogError::ShiftOutOfRange {
                    name: voice.name().to_string(),
                    semitones: voice.pitch_shift_semitones(),
                });
            }
            if index.insert(voice.name().to_string(), i).is_some() {
                return Err(CatalogError::DuplicateName(voice.name().to_string()));
            }
        }

        let default_index = *index.get(DEFAULT_VOICE).ok_or(CatalogError::MissingDefault)?;
        let shift = voices[default_index].pitch_shift_semitones();
        if shift != 0 {
            return Err(CatalogError::ShiftedDefault(shift));
        }

        Ok(Self {
            voices,
            index,
            default_index,
        })
    }

    /// 以基础音色构建目录，default 条目追加在末尾
    pub fn with_base_voice(
        base_clip: impl Into<PathBuf>,
        voices: impl IntoIterator<Item = VoiceSpec>,
    ) -> Result<Self, CatalogError> {
        let mut voices: Vec<VoiceSpec> = voices.into_iter().collect();
        voices.push(VoiceSpec::new(DEFAULT_VOICE, base_clip, 0));
        Self::new(voices)
    }

    /// 查找音色，未知名称回退到 default
    pub fn lookup(&self, speaker: &str) -> &VoiceSpec {
        let i = self.index.get(speaker).copied().unwrap_or(self.default_index);
        &self.voices[i]
    }

    /// 是否为目录中显式配置的说话人
    pub fn contains(&self, speaker: &str) -> bool {
        self.index.contains_key(speaker)
    }

    /// 按构建顺序列出所有音色
    pub fn list_all(&self) -> &[VoiceSpec] {
        &self.voices
    }

    pub fn default_voice(&self) -> &VoiceSpec {
        &self.voices[self.default_index]
    }

    /// 基础音色参考音频路径
    pub fn base_clip(&self) -> &Path {
        self.default_voice().clip_path()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> VoiceCatalog {
        VoiceCatalog::with_base_voice(
            "base.wav",
            vec![
                VoiceSpec::new("Marie Curie", "voices/curie.wav", 4),
                VoiceSpec::new("Abraham Lincoln", "voices/lincoln.wav", -2),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_lookup_known_speaker() {
        let catalog = catalog();
        let spec = catalog.lookup("Marie Curie");
        assert_eq!(spec.pitch_shift_semitones(), 4);
        assert_eq!(spec.clip_path(), Path::new("voices/curie.wav"));
    }

    #[test]
    fn test_unknown_speaker_falls_back_to_default() {
        let catalog = catalog();
        let spec = catalog.lookup("Unknown Figure");
        assert!(spec.is_default());
        assert_eq!(spec.pitch_shift_semitones(), 0);
        assert_eq!(spec.clip_path(), catalog.base_clip());
        assert!(!catalog.contains("Unknown Figure"));
    }

    #[test]
    fn test_list_all_keeps_order() {
        let catalog = catalog();
        let names: Vec<&str> = catalog.list_all().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["Marie Curie", "Abraham Lincoln", "default"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let result = VoiceCatalog::with_base_voice(
            "base.wav",
            vec![
                VoiceSpec::new("Cleopatra", "a.wav", 5),
                VoiceSpec::new("Cleopatra", "b.wav", 5),
            ],
        );
        assert!(matches!(result, Err(CatalogError::DuplicateName(_))));
    }

    #[test]
    fn test_default_must_exist_and_be_unshifted() {
        let missing = VoiceCatalog::new(vec![VoiceSpec::new("Cleopatra", "a.wav", 5)]);
        assert!(matches!(missing, Err(CatalogError::MissingDefault)));

        let shifted = VoiceCatalog::new(vec![VoiceSpec::new(DEFAULT_VOICE, "base.wav", 2)]);
        assert!(matches!(shifted, Err(CatalogError::ShiftedDefault(2))));
    }

    #[test]
    fn test_shift_out_of_range_rejected() {
        let result =
            VoiceCatalog::with_base_voice("base.wav", vec![VoiceSpec::new("Giant", "g.wav", -13)]);
        assert!(matches!(result, Err(CatalogError::ShiftOutOfRange { .. })));
    }
}
