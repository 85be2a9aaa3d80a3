//! voxref - 声音参考解析与变调回退服务
//!
//! 启动流程：加载配置 → 构建音色目录 → 组装适配器与处理器 → 启动清理 Worker 与 HTTP 服务

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use voxref::application::{
    GenerationSettings, ReferenceResolver, SweepArtifactsHandler, SynthesizerPort,
    TransientLeases,
};
use voxref::config::{load_config, print_config, SynthBackend, VoicesConfig};
use voxref::domain::{VoiceCatalog, VoiceSpec};
use voxref::infrastructure::adapters::{
    FakeSynthClient, FakeSynthClientConfig, FileRetentionManager, HttpSynthClient,
    HttpSynthClientConfig, WavCodec,
};
use voxref::infrastructure::http::{AppState, HttpServer, ServerConfig};
use voxref::infrastructure::worker::{RetentionWorker, RetentionWorkerConfig};

/// 从配置构建音色目录，default 条目指向基础音色
fn build_catalog(voices: &VoicesConfig) -> Result<VoiceCatalog, voxref::domain::voice::CatalogError> {
    let specs = voices
        .entries
        .iter()
        .map(|e| VoiceSpec::new(e.name.clone(), e.clip.clone(), e.pitch_shift));
    VoiceCatalog::with_base_voice(voices.base_clip.clone(), specs)
}

/// 启动时报告哪些音色有原始参考、哪些将由基础音色变调得到
fn report_catalog(catalog: &VoiceCatalog) {
    let base = catalog.base_clip();
    if base.exists() {
        tracing::info!(path = %base.display(), "Base voice found");
    } else {
        tracing::error!(
            path = %base.display(),
            "Base voice not found; every speaker without its own clip will fail"
        );
    }

    let mut synthetic = Vec::new();
    for spec in catalog.list_all().iter().filter(|s| !s.is_default()) {
        if spec.clip_path().exists() {
            tracing::info!(speaker = %spec.name(), path = %spec.clip_path().display(), "Voice reference found");
        } else {
            synthetic.push(format!("{} ({:+})", spec.name(), spec.pitch_shift_semitones()));
        }
    }

    if !synthetic.is_empty() {
        tracing::info!(
            count = synthetic.len(),
            voices = %synthetic.join(", "),
            "Synthetic voices (base voice with pitch shift)"
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},voxref={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("voxref {} starting", env!("CARGO_PKG_VERSION"));
    print_config(&config);

    // 音色目录
    let catalog = Arc::new(build_catalog(&config.voices)?);
    report_catalog(&catalog);

    tokio::fs::create_dir_all(&config.storage.output_dir).await?;

    // 适配器
    let codec = Arc::new(WavCodec::new());
    let leases = Arc::new(TransientLeases::new());
    let resolver = Arc::new(
        ReferenceResolver::new(catalog.clone(), codec, leases.clone())
            .with_min_reference_secs(config.generation.min_reference_secs),
    );

    let synthesizer: Arc<dyn SynthesizerPort> = match config.synth.backend {
        SynthBackend::Http => Arc::new(HttpSynthClient::new(
            HttpSynthClientConfig::new(&config.synth.url).with_timeout(config.synth.timeout_secs),
        )?),
        SynthBackend::Fake => {
            tracing::warn!("Using fake synthesizer: outputs echo the reference audio");
            Arc::new(FakeSynthClient::new(FakeSynthClientConfig::default()))
        }
    };

    if !synthesizer.health_check().await {
        tracing::warn!(url = %config.synth.url, "Synthesizer is not reachable yet");
    }

    // 清理
    let retention = Arc::new(
        FileRetentionManager::new(
            &config.storage.output_dir,
            vec![catalog.base_clip().to_path_buf()],
        )
        .with_leases(leases),
    );
    let sweep_handler = Arc::new(SweepArtifactsHandler::new(
        retention,
        Duration::from_secs(config.retention.max_age_secs),
    ));

    let shutdown = CancellationToken::new();
    if config.retention.enabled {
        let worker = RetentionWorker::new(
            RetentionWorkerConfig {
                interval: Duration::from_secs(config.retention.interval_secs),
            },
            sweep_handler.clone(),
            shutdown.clone(),
        );
        tokio::spawn(worker.run());
    }

    // HTTP 服务器
    let settings = GenerationSettings {
        output_dir: config.storage.output_dir.clone(),
        max_text_chars: config.generation.max_text_chars,
        language: config.synth.language.clone(),
    };
    let state = AppState::new(catalog, resolver, synthesizer, sweep_handler, settings);
    let server = HttpServer::new(
        ServerConfig::new(&config.server.host, config.server.port),
        state,
    );

    // 启动服务器（带优雅关闭）
    let signal = shutdown.clone();
    server
        .run_with_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
            signal.cancel();
        })
        .await?;

    shutdown.cancel();
    tracing::info!("Server shutdown complete");

    Ok(())
}
