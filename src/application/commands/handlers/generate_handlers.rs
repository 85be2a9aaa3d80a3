//! Generate Command Handlers
//!
//! 单次生成请求的编排：清理文本 → 解析参考音频 → 命名 → 调用合成器 → 清理临时文件

use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::application::commands::{GenerateSpeech, GeneratedArtifact};
use crate::application::error::EngineError;
use crate::application::ports::{SynthesisRequest, SynthesizerPort};
use crate::application::resolver::ReferenceResolver;
use crate::domain::{naming, text};

/// 生成参数
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// 生成文件目录
    pub output_dir: PathBuf,
    /// 文本最大字符数，超出截断
    pub max_text_chars: usize,
    /// 合成语言
    pub language: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("audio_outputs"),
            max_text_chars: 500,
            language: "en".to_string(),
        }
    }
}

/// GenerateSpeech Handler
pub struct GenerateSpeechHandler {
    resolver: Arc<ReferenceResolver>,
    synthesizer: Arc<dyn SynthesizerPort>,
    settings: GenerationSettings,
}

impl GenerateSpeechHandler {
    pub fn new(
        resolver: Arc<ReferenceResolver>,
        synthesizer: Arc<dyn SynthesizerPort>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            resolver,
            synthesizer,
            settings,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub async fn handle(&self, command: GenerateSpeech) -> Result<GeneratedArtifact, EngineError> {
        let started = Instant::now();
        let speaker = command.speaker;

        let normalized = text::normalize(&command.text, self.settings.max_text_chars);
        if normalized.is_blank() {
            return Err(EngineError::validation("Text must not be empty"));
        }
        if let Some(original_len) = normalized.truncated_from {
            tracing::warn!(
                speaker = %speaker,
                original_len = original_len,
                max_len = self.settings.max_text_chars,
                "Text truncated"
            );
        }
        let text_len = normalized.char_count();

        tracing::info!(speaker = %speaker, text_len = text_len, "New generation request");

        // 临时变调文件归 reference 所有，任何返回路径（包括 future 被取消）都会删除
        let reference = self.resolver.resolve(&speaker).await?;

        let file_name = naming::name_for(&speaker, &normalized.text);
        tokio::fs::create_dir_all(&self.settings.output_dir)
            .await
            .map_err(|e| EngineError::Io(format!("Failed to create output directory: {}", e)))?;
        let output_path = self.settings.output_dir.join(&file_name);

        let result = self
            .synthesizer
            .synthesize(SynthesisRequest {
                text: &normalized.text,
                reference_path: reference.backing_path(),
                reference: reference.buffer(),
                language: &self.settings.language,
                output_path: &output_path,
            })
            .await;

        let applied_shift = reference.applied_shift_semitones();
        let source_kind = reference.source_kind();
        let reference_warning = reference.warning().map(|w| w.to_string());
        reference.release();

        if let Err(source) = result {
            tracing::error!(speaker = %speaker, text_len = text_len, error = %source, "Synthesis failed");
            return Err(EngineError::SynthesisFailed {
                speaker,
                text_len,
                source,
            });
        }

        let generation_duration_secs = started.elapsed().as_secs_f64();
        let id = file_name.trim_end_matches(".wav").to_string();

        tracing::info!(
            speaker = %speaker,
            id = %id,
            path = %output_path.display(),
            pitch_shift = applied_shift,
            source = %source_kind,
            elapsed_secs = generation_duration_secs,
            "Audio generated"
        );

        Ok(GeneratedArtifact {
            id,
            path: output_path,
            speaker,
            created_at: Utc::now(),
            pitch_shift_applied: applied_shift,
            generation_duration_secs,
            source_kind,
            text_length: text_len,
            reference_warning,
        })
    }
}
