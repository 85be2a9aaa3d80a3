//! Voice Query Handlers

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::SynthesizerPort;
use crate::application::queries::{GetHealth, ListVoices};
use crate::domain::voice::{VoiceCatalog, VoiceSpec};

// ============================================================================
// Response DTOs
// ============================================================================

/// 单个音色状态
#[derive(Debug, Clone, Serialize)]
pub struct VoiceStatus {
    pub name: String,
    pub reference_file: String,
    /// 参考音频是否存在于磁盘
    pub exists: bool,
    pub pitch_shift: i32,
    /// 参考缺失时由基础音色变调得到
    pub is_synthetic: bool,
    pub base_voice: String,
}

/// 音色列表响应
#[derive(Debug, Clone, Serialize)]
pub struct VoiceListResponse {
    pub voices: Vec<VoiceStatus>,
    pub total: usize,
    pub base_voice: String,
    pub base_voice_available: bool,
}

/// 健康检查响应
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub base_voice_available: bool,
    pub synthesizer_available: bool,
    pub total_voices: usize,
}

// ============================================================================
// Handlers
// ============================================================================

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// ListVoices Handler
pub struct ListVoicesHandler {
    catalog: Arc<VoiceCatalog>,
}

impl ListVoicesHandler {
    pub fn new(catalog: Arc<VoiceCatalog>) -> Self {
        Self { catalog }
    }

    async fn status_of(&self, spec: &VoiceSpec, base_voice: &str) -> VoiceStatus {
        let present = exists(spec.clip_path()).await;
        VoiceStatus {
            name: spec.name().to_string(),
            reference_file: spec.clip_path().display().to_string(),
            exists: present,
            pitch_shift: spec.pitch_shift_semitones(),
            is_synthetic: !present && spec.clip_path() != self.catalog.base_clip(),
            base_voice: base_voice.to_string(),
        }
    }

    pub async fn handle(&self, _query: ListVoices) -> VoiceListResponse {
        let base_voice = self.catalog.base_clip().display().to_string();

        let mut voices = Vec::with_capacity(self.catalog.len());
        for spec in self.catalog.list_all() {
            voices.push(self.status_of(spec, &base_voice).await);
        }

        VoiceListResponse {
            total: voices.len(),
            base_voice_available: exists(self.catalog.base_clip()).await,
            voices,
            base_voice,
        }
    }
}

/// GetHealth Handler
pub struct HealthHandler {
    catalog: Arc<VoiceCatalog>,
    synthesizer: Arc<dyn SynthesizerPort>,
}

impl HealthHandler {
    pub fn new(catalog: Arc<VoiceCatalog>, synthesizer: Arc<dyn SynthesizerPort>) -> Self {
        Self {
            catalog,
            synthesizer,
        }
    }

    pub async fn handle(&self, _query: GetHealth) -> HealthResponse {
        let base_voice_available = exists(self.catalog.base_clip()).await;
        let synthesizer_available = self.synthesizer.health_check().await;

        let status = if base_voice_available && synthesizer_available {
            "healthy"
        } else {
            "degraded"
        };

        HealthResponse {
            status,
            base_voice_available,
            synthesizer_available,
            total_voices: self.catalog.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::{FakeSynthClient, FakeSynthClientConfig};
    use tempfile::tempdir;

    fn catalog(dir: &Path) -> VoiceCatalog {
        let base = dir.join("kenny.wav");
        VoiceCatalog::with_base_voice(
            &base,
            vec![
                VoiceSpec::new("Albert Einstein", dir.join("einstein.wav"), 1),
                VoiceSpec::new("Marie Curie", dir.join("curie.wav"), 4),
                VoiceSpec::new("John F. Kennedy", &base, 0),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_voices_reports_file_status() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("kenny.wav"), b"RIFF").unwrap();
        std::fs::write(dir.path().join("einstein.wav"), b"RIFF").unwrap();

        let handler = ListVoicesHandler::new(Arc::new(catalog(dir.path())));
        let response = handler.handle(ListVoices).await;

        assert_eq!(response.total, 4);
        assert!(response.base_voice_available);

        let find = |name: &str| {
            response
                .voices
                .iter()
                .find(|v| v.name == name)
                .cloned()
                .unwrap()
        };

        let einstein = find("Albert Einstein");
        assert!(einstein.exists);
        assert!(!einstein.is_synthetic);
        assert_eq!(einstein.pitch_shift, 1);

        let curie = find("Marie Curie");
        assert!(!curie.exists);
        assert!(curie.is_synthetic);

        let jfk = find("John F. Kennedy");
        assert!(jfk.exists);
        assert!(!jfk.is_synthetic);
    }

    #[tokio::test]
    async fn test_missing_base_clip_is_not_synthetic() {
        let dir = tempdir().unwrap();
        let handler = ListVoicesHandler::new(Arc::new(catalog(dir.path())));
        let response = handler.handle(ListVoices).await;

        assert!(!response.base_voice_available);
        let default = response.voices.iter().find(|v| v.name == "default").unwrap();
        assert!(!default.exists);
        assert!(!default.is_synthetic);
    }

    #[tokio::test]
    async fn test_health_is_degraded_without_base_voice() {
        let dir = tempdir().unwrap();
        let catalog = Arc::new(catalog(dir.path()));
        let synth = Arc::new(FakeSynthClient::new(FakeSynthClientConfig::default()));
        let handler = HealthHandler::new(catalog, synth);

        let health = handler.handle(GetHealth).await;
        assert_eq!(health.status, "degraded");
        assert!(health.synthesizer_available);
        assert_eq!(health.total_voices, 4);

        std::fs::write(dir.path().join("kenny.wav"), b"RIFF").unwrap();
        let health = handler.handle(GetHealth).await;
        assert_eq!(health.status, "healthy");
    }
}
