//! Fake Synth Client - 用于测试和离线运行的合成器
//!
//! 不调用任何模型，直接把参考音频写到输出路径

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::application::ports::{AudioCodecPort, SynthesisError, SynthesisRequest, SynthesizerPort};
use crate::infrastructure::adapters::codec::WavCodec;

/// Fake Synth Client 配置
#[derive(Debug, Clone)]
pub struct FakeSynthClientConfig {
    /// 模拟推理延迟
    pub latency: Duration,
    /// 设置后每次调用都以 ServiceError 失败
    pub fail_with: Option<String>,
}

impl Default for FakeSynthClientConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(20),
            fail_with: None,
        }
    }
}

/// Fake Synth Client
pub struct FakeSynthClient {
    config: FakeSynthClientConfig,
    codec: WavCodec,
    invocations: AtomicUsize,
    last_reference: Mutex<Option<PathBuf>>,
}

impl FakeSynthClient {
    pub fn new(config: FakeSynthClientConfig) -> Self {
        tracing::info!(
            latency_ms = config.latency.as_millis() as u64,
            failing = config.fail_with.is_some(),
            "FakeSynthClient initialized"
        );
        Self {
            config,
            codec: WavCodec::new(),
            invocations: AtomicUsize::new(0),
            last_reference: Mutex::new(None),
        }
    }

    /// 已收到的合成请求数
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    /// 最近一次请求使用的参考音频路径
    pub fn last_reference_path(&self) -> Option<PathBuf> {
        self.last_reference
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl SynthesizerPort for FakeSynthClient {
    async fn synthesize(&self, request: SynthesisRequest<'_>) -> Result<(), SynthesisError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_reference.lock() {
            *last = Some(request.reference_path.to_path_buf());
        }

        tracing::debug!(
            text_len = request.text.chars().count(),
            reference = %request.reference_path.display(),
            output = %request.output_path.display(),
            "FakeSynthClient: echoing reference audio"
        );

        tokio::time::sleep(self.config.latency).await;

        if let Some(reason) = &self.config.fail_with {
            return Err(SynthesisError::ServiceError(reason.clone()));
        }

        self.codec
            .encode(request.reference, request.output_path)
            .await
            .map_err(|e| SynthesisError::IoError(e.to_string()))
    }
}
