//! HTTP Synth Client - 调用外部声音克隆服务
//!
//! 外部 API:
//! POST {base_url}/api/tts/clone
//! Request: multipart/form-data，字段 text、language、speaker_wav（参考音频文件）
//! Response: audio/wav binary

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;

use crate::application::ports::{SynthesisError, SynthesisRequest, SynthesizerPort};

/// HTTP 合成客户端配置
#[derive(Debug, Clone)]
pub struct HttpSynthClientConfig {
    /// 合成服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpSynthClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5002".to_string(),
            timeout_secs: 300,
        }
    }
}

impl HttpSynthClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 合成客户端
pub struct HttpSynthClient {
    client: Client,
    config: HttpSynthClientConfig,
}

impl HttpSynthClient {
    pub fn new(config: HttpSynthClientConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn clone_url(&self) -> String {
        format!("{}/api/tts/clone", self.config.base_url.trim_end_matches('/'))
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SynthesizerPort for HttpSynthClient {
    async fn synthesize(&self, request: SynthesisRequest<'_>) -> Result<(), SynthesisError> {
        let reference = tokio::fs::read(request.reference_path)
            .await
            .map_err(|e| SynthesisError::IoError(format!("Failed to read reference: {}", e)))?;

        let file_name = request
            .reference_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "reference.wav".to_string());

        let part = Part::bytes(reference)
            .file_name(file_name)
            .mime_str("audio/wav")
            .map_err(|e| SynthesisError::InvalidResponse(e.to_string()))?;

        let form = Form::new()
            .text("text", request.text.to_string())
            .text("language", request.language.to_string())
            .part("speaker_wav", part);

        tracing::debug!(
            url = %self.clone_url(),
            text_len = request.text.chars().count(),
            reference = %request.reference_path.display(),
            "Sending synthesis request"
        );

        let response = self
            .client
            .post(self.clone_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout
                } else if e.is_connect() {
                    SynthesisError::NetworkError(format!("Cannot connect to synthesis service: {}", e))
                } else {
                    SynthesisError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SynthesisError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(format!("Failed to read audio: {}", e)))?;

        if audio.is_empty() {
            return Err(SynthesisError::InvalidResponse("Empty audio body".to_string()));
        }

        tokio::fs::write(request.output_path, &audio)
            .await
            .map_err(|e| SynthesisError::IoError(format!("Failed to write output: {}", e)))?;

        tracing::debug!(
            output = %request.output_path.display(),
            audio_size = audio.len(),
            "Synthesis response written"
        );

        Ok(())
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
