//! Retention Command Handlers

use std::sync::Arc;
use std::time::Duration;

use crate::application::commands::SweepArtifacts;
use crate::application::ports::{RetentionPort, SweepReport};

/// SweepArtifacts Handler
pub struct SweepArtifactsHandler {
    retention: Arc<dyn RetentionPort>,
    default_max_age: Duration,
}

impl SweepArtifactsHandler {
    pub fn new(retention: Arc<dyn RetentionPort>, default_max_age: Duration) -> Self {
        Self {
            retention,
            default_max_age,
        }
    }

    pub fn default_max_age(&self) -> Duration {
        self.default_max_age
    }

    pub async fn handle(&self, command: SweepArtifacts) -> SweepReport {
        let max_age = command.max_age.unwrap_or(self.default_max_age);
        let report = self.retention.sweep(max_age).await;

        tracing::info!(
            max_age_secs = max_age.as_secs(),
            deleted_artifacts = report.deleted_artifacts,
            deleted_transients = report.deleted_transients,
            failed = report.failed,
            "Cleanup completed"
        );

        report
    }
}
