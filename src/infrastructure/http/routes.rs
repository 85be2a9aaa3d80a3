//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping              GET   存活检查
//! - /api/health            GET   基础音色与合成器状态
//! - /api/voice/list        GET   列出所有音色
//! - /api/voice/generate    POST  生成语音（表单 text、speaker），返回 WAV
//! - /api/cleanup           POST  清理过期生成文件和临时文件（?max_age_hours=24）

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/health", get(handlers::health))
        .nest("/voice", voice_routes())
        .route("/cleanup", post(handlers::cleanup))
}

/// Voice 路由
fn voice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/list", get(handlers::list_voices))
        .route("/generate", post(handlers::generate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{
        AudioCodecPort, GenerationSettings, ReferenceResolver, SweepArtifactsHandler,
        TransientLeases,
    };
    use crate::domain::{AudioBuffer, VoiceCatalog, VoiceSpec};
    use crate::infrastructure::adapters::{
        FakeSynthClient, FakeSynthClientConfig, FileRetentionManager, WavCodec,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use std::time::Duration;
    use tempfile::{tempdir, TempDir};
    use tower::util::ServiceExt;

    async fn test_app() -> (TempDir, Router) {
        let dir = tempdir().unwrap();
        let base = dir.path().join("kenny.wav");
        let codec = Arc::new(WavCodec::new());
        codec
            .encode(&AudioBuffer::new(vec![0.25; 8000 * 7], 8000), &base)
            .await
            .unwrap();

        let catalog = Arc::new(
            VoiceCatalog::with_base_voice(
                &base,
                vec![
                    VoiceSpec::new("John F. Kennedy", &base, 0),
                    VoiceSpec::new("Cleopatra", dir.path().join("cleopatra.wav"), 5),
                ],
            )
            .unwrap(),
        );
        let leases = Arc::new(TransientLeases::new());
        let resolver = Arc::new(ReferenceResolver::new(
            catalog.clone(),
            codec,
            leases.clone(),
        ));
        let synth = Arc::new(FakeSynthClient::new(FakeSynthClientConfig::default()));
        let output_dir = dir.path().join("audio_outputs");
        let retention = Arc::new(
            FileRetentionManager::new(&output_dir, vec![catalog.base_clip().to_path_buf()])
                .with_leases(leases),
        );
        let sweep = Arc::new(SweepArtifactsHandler::new(
            retention,
            Duration::from_secs(86400),
        ));
        let settings = GenerationSettings {
            output_dir,
            ..Default::default()
        };

        let state = AppState::new(catalog, resolver, synth, sweep, settings);
        let app = create_routes().with_state(Arc::new(state));
        (dir, app)
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn generate_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/voice/generate")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_voice_list() {
        let (_dir, app) = test_app().await;
        let response = app
            .oneshot(Request::get("/api/voice/list").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["errno"], 0);
        assert_eq!(json["data"]["total"], 3);
        assert_eq!(json["data"]["base_voice_available"], true);
    }

    #[tokio::test]
    async fn test_generate_returns_wav_with_headers() {
        let (dir, app) = test_app().await;
        let response = app
            .oneshot(generate_request("text=Veni+vidi&speaker=Cleopatra"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "audio/wav");
        assert_eq!(headers["x-speaker"], "Cleopatra");
        assert_eq!(headers["x-pitch-shift"], "5");
        assert_eq!(headers["x-voice-type"], "synthetic");
        assert_eq!(headers["x-text-length"], "9");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert!(!dir.path().join("kenny_shifted_5.wav").exists());
    }

    #[tokio::test]
    async fn test_generate_without_speaker_uses_default() {
        let (_dir, app) = test_app().await;
        let response = app.oneshot(generate_request("text=Hello")).await.unwrap();

        assert_eq!(response.headers()["x-speaker"], "default");
        assert_eq!(response.headers()["x-voice-type"], "original");
    }

    #[tokio::test]
    async fn test_generate_empty_text_is_bad_request() {
        let (_dir, app) = test_app().await;
        let response = app.oneshot(generate_request("text=**")).await.unwrap();

        let json = json_body(response).await;
        assert_eq!(json["errno"], 400);
    }

    #[tokio::test]
    async fn test_cleanup_reports_counts() {
        let (dir, app) = test_app().await;
        std::fs::write(dir.path().join("kenny_shifted_7.wav"), b"RIFF").unwrap();

        let response = app
            .oneshot(
                Request::post("/api/cleanup?max_age_hours=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = json_body(response).await;
        assert_eq!(json["data"]["deleted_transients"], 1);
        assert_eq!(json["data"]["max_age_hours"], 1);
        assert!(!dir.path().join("kenny_shifted_7.wav").exists());
    }
}
