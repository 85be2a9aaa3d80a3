//! Reference Resolver - 说话人 → 参考音频
//!
//! 解析流程:
//! 1. 目录中显式配置且参考音频存在 → 直接使用（Original）
//! 2. 否则加载基础音色（缺失即致命错误 MissingBaseVoice）
//! 3. 音调偏移为 0 → 直接使用基础音色（SyntheticFromBase）
//! 4. 否则变调并写入临时文件，请求结束后删除（SyntheticFromBase）

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::error::EngineError;
use crate::application::leases::{TransientLease, TransientLeases};
use crate::application::ports::AudioCodecPort;
use crate::domain::audio::{self, AudioBuffer};
use crate::domain::naming;
use crate::domain::voice::{SourceKind, VoiceCatalog};

/// 默认最短可用参考音频时长（秒）
pub const DEFAULT_MIN_REFERENCE_SECS: f64 = 6.0;

/// 参考音频质量提示（不影响请求成功与否）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReferenceWarning {
    /// 参考音频过短，合成质量可能下降
    ShortReference { duration_secs: f64, minimum_secs: f64 },
}

impl std::fmt::Display for ReferenceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShortReference {
                duration_secs,
                minimum_secs,
            } => write!(
                f,
                "reference audio is only {:.2}s (recommended at least {:.0}s)",
                duration_secs, minimum_secs
            ),
        }
    }
}

/// 临时变调文件
///
/// drop 时删除文件，然后释放占用；请求成功、失败或被取消都会执行
#[derive(Debug)]
pub struct TransientFile {
    path: PathBuf,
    _lease: TransientLease,
}

impl TransientFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Transient reference removed");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove transient reference"
                );
            }
        }
    }
}

/// 解析结果
#[derive(Debug)]
pub struct ResolvedReference {
    buffer: AudioBuffer,
    source_kind: SourceKind,
    applied_shift_semitones: i32,
    source_path: PathBuf,
    transient: Option<TransientFile>,
    warning: Option<ReferenceWarning>,
}

impl ResolvedReference {
    pub fn buffer(&self) -> &AudioBuffer {
        &self.buffer
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source_kind
    }

    pub fn applied_shift_semitones(&self) -> i32 {
        self.applied_shift_semitones
    }

    /// 样本来源的音频文件（说话人自己的或基础音色）
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn transient_path(&self) -> Option<&Path> {
        self.transient.as_ref().map(|t| t.path())
    }

    /// 交给合成器的文件：存在临时文件时为临时文件，否则为来源文件
    pub fn backing_path(&self) -> &Path {
        self.transient_path().unwrap_or(&self.source_path)
    }

    pub fn warning(&self) -> Option<ReferenceWarning> {
        self.warning
    }

    /// 结束使用，删除临时文件（如有）
    pub fn release(self) {
        drop(self);
    }
}

/// 参考音频解析器
pub struct ReferenceResolver {
    catalog: Arc<VoiceCatalog>,
    codec: Arc<dyn AudioCodecPort>,
    leases: Arc<TransientLeases>,
    min_reference_secs: f64,
}

impl ReferenceResolver {
    pub fn new(
        catalog: Arc<VoiceCatalog>,
        codec: Arc<dyn AudioCodecPort>,
        leases: Arc<TransientLeases>,
    ) -> Self {
        Self {
            catalog,
            codec,
            leases,
            min_reference_secs: DEFAULT_MIN_REFERENCE_SECS,
        }
    }

    pub fn with_min_reference_secs(mut self, secs: f64) -> Self {
        self.min_reference_secs = secs;
        self
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// 解析说话人的参考音频
    pub async fn resolve(&self, speaker: &str) -> Result<ResolvedReference, EngineError> {
        let spec = self.catalog.lookup(speaker);

        if self.catalog.contains(speaker) && path_exists(spec.clip_path()).await? {
            tracing::debug!(
                speaker = %speaker,
                path = %spec.clip_path().display(),
                "Using dedicated voice reference"
            );
            let buffer = self.codec.decode(spec.clip_path()).await?;
            return Ok(self.finish(ResolvedReference {
                buffer,
                source_kind: SourceKind::Original,
                applied_shift_semitones: 0,
                source_path: spec.clip_path().to_path_buf(),
                transient: None,
                warning: None,
            }));
        }

        let base_clip = self.catalog.base_clip();
        if !path_exists(base_clip).await? {
            tracing::error!(path = %base_clip.display(), "Base voice reference is missing");
            return Err(EngineError::MissingBaseVoice {
                path: base_clip.to_path_buf(),
            });
        }

        let semitones = spec.pitch_shift_semitones();
        tracing::info!(
            speaker = %speaker,
            semitones = semitones,
            "Voice clip not available, deriving reference from base voice"
        );

        let base_buffer = self.codec.decode(base_clip).await?;

        if semitones == 0 {
            return Ok(self.finish(ResolvedReference {
                buffer: base_buffer,
                source_kind: SourceKind::SyntheticFromBase,
                applied_shift_semitones: 0,
                source_path: base_clip.to_path_buf(),
                transient: None,
                warning: None,
            }));
        }

        let transient_path = naming::transient_path(base_clip, semitones);
        let lease = self.leases.acquire(&transient_path).await;
        let codec = self.codec.clone();

        // 变调与写入在独立任务中完成，守卫归该任务所有：
        // 请求被取消时任务继续跑完，写入结束后才删除文件并释放占用
        let writer = tokio::spawn(async move {
            let transient = TransientFile {
                path: transient_path,
                _lease: lease,
            };
            let shifted =
                tokio::task::spawn_blocking(move || audio::shift(base_buffer, semitones)).await??;
            codec.encode(&shifted, transient.path()).await?;
            Ok::<_, EngineError>((shifted, transient))
        });
        let (shifted, transient) = writer.await??;

        tracing::info!(
            speaker = %speaker,
            semitones = semitones,
            path = %transient.path().display(),
            "Pitch-shifted reference written"
        );

        Ok(self.finish(ResolvedReference {
            buffer: shifted,
            source_kind: SourceKind::SyntheticFromBase,
            applied_shift_semitones: semitones,
            source_path: base_clip.to_path_buf(),
            transient: Some(transient),
            warning: None,
        }))
    }

    /// 检查参考音频时长，过短时只记录警告
    fn finish(&self, mut reference: ResolvedReference) -> ResolvedReference {
        let duration_secs = reference.buffer.duration_secs();
        if duration_secs < self.min_reference_secs {
            tracing::warn!(
                path = %reference.backing_path().display(),
                duration_secs = duration_secs,
                minimum_secs = self.min_reference_secs,
                "Reference audio is shorter than recommended, synthesis quality may degrade"
            );
            reference.warning = Some(ReferenceWarning::ShortReference {
                duration_secs,
                minimum_secs: self.min_reference_secs,
            });
        }
        reference
    }
}

async fn path_exists(path: &Path) -> Result<bool, EngineError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| EngineError::Io(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CodecError;
    use crate::domain::voice::VoiceSpec;
    use crate::infrastructure::adapters::WavCodec;
    use async_trait::async_trait;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};

    const SAMPLE_RATE: u32 = 8000;

    async fn write_tone(codec: &WavCodec, path: &Path, secs: f32, freq: f32) {
        let len = (secs * SAMPLE_RATE as f32) as usize;
        let samples = (0..len)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * freq * i as f32 / SAMPLE_RATE as f32).sin())
            .collect();
        codec
            .encode(&AudioBuffer::new(samples, SAMPLE_RATE), path)
            .await
            .unwrap();
    }

    struct Fixture {
        dir: TempDir,
        resolver: ReferenceResolver,
    }

    impl Fixture {
        fn base(&self) -> PathBuf {
            self.dir.path().join("kenny.wav")
        }
    }

    async fn fixture(base_secs: Option<f32>) -> Fixture {
        let dir = tempdir().unwrap();
        let codec = WavCodec::new();
        let base = dir.path().join("kenny.wav");
        if let Some(secs) = base_secs {
            write_tone(&codec, &base, secs, 220.0).await;
        }

        let einstein = dir.path().join("einstein.wav");
        write_tone(&codec, &einstein, 7.0, 180.0).await;

        let catalog = VoiceCatalog::with_base_voice(
            &base,
            vec![
                VoiceSpec::new("Albert Einstein", &einstein, 1),
                VoiceSpec::new("Marie Curie", dir.path().join("curie.wav"), 4),
                VoiceSpec::new("Leonardo da Vinci", dir.path().join("davinci.wav"), 0),
            ],
        )
        .unwrap();

        let resolver = ReferenceResolver::new(
            Arc::new(catalog),
            Arc::new(codec),
            Arc::new(TransientLeases::new()),
        );

        Fixture { dir, resolver }
    }

    #[tokio::test]
    async fn test_dedicated_clip_is_used_as_is() {
        let fx = fixture(Some(7.0)).await;
        let reference = fx.resolver.resolve("Albert Einstein").await.unwrap();

        assert_eq!(reference.source_kind(), SourceKind::Original);
        assert_eq!(reference.applied_shift_semitones(), 0);
        assert!(reference.transient_path().is_none());
        assert_eq!(reference.source_path(), fx.dir.path().join("einstein.wav"));
        assert!(reference.warning().is_none());
    }

    #[tokio::test]
    async fn test_missing_clip_is_pitch_shifted_from_base() {
        let fx = fixture(Some(7.0)).await;
        let reference = fx.resolver.resolve("Marie Curie").await.unwrap();

        assert_eq!(reference.source_kind(), SourceKind::SyntheticFromBase);
        assert_eq!(reference.applied_shift_semitones(), 4);
        assert_eq!(reference.source_path(), fx.base());

        let transient = reference.transient_path().unwrap().to_path_buf();
        assert_eq!(transient, fx.dir.path().join("kenny_shifted_4.wav"));
        assert!(transient.exists());
        assert_eq!(reference.backing_path(), transient.as_path());
        assert_eq!(reference.buffer().len(), 7 * SAMPLE_RATE as usize);

        reference.release();
        assert!(!transient.exists());
    }

    #[tokio::test]
    async fn test_unknown_speaker_uses_base_voice() {
        let fx = fixture(Some(7.0)).await;
        let reference = fx.resolver.resolve("Unknown Figure").await.unwrap();
        let expected_shift = fx
            .resolver
            .catalog()
            .lookup("Unknown Figure")
            .pitch_shift_semitones();

        assert_eq!(reference.source_kind(), SourceKind::SyntheticFromBase);
        assert_eq!(reference.applied_shift_semitones(), expected_shift);
        assert_eq!(reference.applied_shift_semitones(), 0);
        assert!(reference.transient_path().is_none());
        assert_eq!(reference.backing_path(), fx.base());
    }

    #[tokio::test]
    async fn test_missing_clip_without_shift_uses_base_directly() {
        let fx = fixture(Some(7.0)).await;
        let reference = fx.resolver.resolve("Leonardo da Vinci").await.unwrap();

        assert_eq!(reference.source_kind(), SourceKind::SyntheticFromBase);
        assert_eq!(reference.applied_shift_semitones(), 0);
        assert!(reference.transient_path().is_none());
    }

    #[tokio::test]
    async fn test_missing_base_voice_is_fatal() {
        let fx = fixture(None).await;
        let err = fx.resolver.resolve("Marie Curie").await.unwrap_err();
        assert!(matches!(err, EngineError::MissingBaseVoice { .. }));
        assert!(err.is_fatal());

        // 有专属音频的说话人不依赖基础音色
        assert!(fx.resolver.resolve("Albert Einstein").await.is_ok());
    }

    #[tokio::test]
    async fn test_short_reference_is_a_warning() {
        let fx = fixture(Some(2.0)).await;
        let reference = fx.resolver.resolve("Unknown Figure").await.unwrap();

        match reference.warning() {
            Some(ReferenceWarning::ShortReference {
                duration_secs,
                minimum_secs,
            }) => {
                assert!((duration_secs - 2.0).abs() < 1e-3);
                assert_eq!(minimum_secs, DEFAULT_MIN_REFERENCE_SECS);
            }
            None => panic!("expected short reference warning"),
        }
    }

    #[tokio::test]
    async fn test_transient_removed_when_dropped() {
        let fx = fixture(Some(7.0)).await;
        let transient = {
            let reference = fx.resolver.resolve("Marie Curie").await.unwrap();
            reference.transient_path().unwrap().to_path_buf()
        };
        assert!(!transient.exists());
    }

    /// 编码在阻塞线程上延迟执行的编解码器
    struct SlowEncodeCodec {
        inner: WavCodec,
        delay: Duration,
    }

    #[async_trait]
    impl AudioCodecPort for SlowEncodeCodec {
        async fn decode(&self, path: &Path) -> Result<AudioBuffer, CodecError> {
            self.inner.decode(path).await
        }

        async fn encode(&self, _buffer: &AudioBuffer, path: &Path) -> Result<(), CodecError> {
            let delay = self.delay;
            let owned = path.to_path_buf();
            tokio::task::spawn_blocking(move || {
                std::thread::sleep(delay);
                std::fs::write(&owned, b"RIFF").map_err(|e| CodecError::encode(&owned, e))
            })
            .await
            .map_err(|e| CodecError::encode(path, e))?
        }
    }

    #[tokio::test]
    async fn test_cancelled_during_encode_leaves_no_transient() {
        let dir = tempdir().unwrap();
        let codec = WavCodec::new();
        let base = dir.path().join("kenny.wav");
        write_tone(&codec, &base, 7.0, 220.0).await;

        let catalog = VoiceCatalog::with_base_voice(
            &base,
            vec![VoiceSpec::new("Marie Curie", dir.path().join("curie.wav"), 4)],
        )
        .unwrap();
        let leases = Arc::new(TransientLeases::new());
        let resolver = ReferenceResolver::new(
            Arc::new(catalog),
            Arc::new(SlowEncodeCodec {
                inner: codec,
                delay: Duration::from_millis(600),
            }),
            leases.clone(),
        );
        let transient = dir.path().join("kenny_shifted_4.wav");

        let result =
            tokio::time::timeout(Duration::from_millis(200), resolver.resolve("Marie Curie")).await;
        assert!(result.is_err());

        // 写入尚未结束时占用仍被持有
        assert!(leases.is_held(&transient));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!transient.exists());
        assert!(!leases.is_held(&transient));
    }
}
