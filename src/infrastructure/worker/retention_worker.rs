//! Retention Worker - 定期执行清理

use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::application::commands::handlers::SweepArtifactsHandler;
use crate::application::commands::SweepArtifacts;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct RetentionWorkerConfig {
    /// 两次清理之间的间隔
    pub interval: Duration,
}

impl Default for RetentionWorkerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600),
        }
    }
}

/// 清理 Worker
///
/// 启动后立即清理一次（回收上次进程遗留的临时文件），之后按间隔执行
pub struct RetentionWorker {
    config: RetentionWorkerConfig,
    handler: Arc<SweepArtifactsHandler>,
    shutdown: CancellationToken,
}

impl RetentionWorker {
    pub fn new(
        config: RetentionWorkerConfig,
        handler: Arc<SweepArtifactsHandler>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config,
            handler,
            shutdown,
        }
    }

    /// 启动 Worker，直到 shutdown token 被取消
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.config.interval.as_secs(),
            max_age_secs = self.handler.default_max_age().as_secs(),
            "RetentionWorker started"
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    let report = self.handler.handle(SweepArtifacts::default()).await;
                    if report.failed > 0 {
                        tracing::warn!(failed = report.failed, "Some files could not be removed");
                    }
                }
            }
        }

        tracing::info!("RetentionWorker stopped");
    }
}
