//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    GenerateSpeechHandler, GenerationSettings, HealthHandler, ListVoicesHandler,
    ReferenceResolver, SweepArtifactsHandler, SynthesizerPort,
};
use crate::domain::VoiceCatalog;

/// 应用状态
pub struct AppState {
    pub catalog: Arc<VoiceCatalog>,

    // ========== Command Handlers ==========
    pub generate_handler: GenerateSpeechHandler,
    pub sweep_handler: Arc<SweepArtifactsHandler>,

    // ========== Query Handlers ==========
    pub list_voices_handler: ListVoicesHandler,
    pub health_handler: HealthHandler,
}

impl AppState {
    /// 创建应用状态
    ///
    /// `sweep_handler` 与后台 RetentionWorker 共享
    pub fn new(
        catalog: Arc<VoiceCatalog>,
        resolver: Arc<ReferenceResolver>,
        synthesizer: Arc<dyn SynthesizerPort>,
        sweep_handler: Arc<SweepArtifactsHandler>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            catalog: catalog.clone(),

            // Command handlers
            generate_handler: GenerateSpeechHandler::new(resolver, synthesizer.clone(), settings),
            sweep_handler,

            // Query handlers
            list_voices_handler: ListVoicesHandler::new(catalog.clone()),
            health_handler: HealthHandler::new(catalog, synthesizer),
        }
    }
}
