//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::application::SweepReport;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Generate DTOs
// ============================================================================

fn default_speaker() -> String {
    crate::domain::voice::DEFAULT_VOICE.to_string()
}

/// 生成请求表单（urlencoded 或 multipart）
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub text: String,
    #[serde(default = "default_speaker")]
    pub speaker: String,
}

// ============================================================================
// Cleanup DTOs
// ============================================================================

fn default_max_age_hours() -> u64 {
    24
}

#[derive(Debug, Deserialize)]
pub struct CleanupQuery {
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u64,
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub message: &'static str,
    pub deleted_files: u64,
    pub deleted_artifacts: u64,
    pub deleted_transients: u64,
    pub failed: u64,
    pub max_age_hours: u64,
}

impl CleanupResponse {
    pub fn new(report: SweepReport, max_age_hours: u64) -> Self {
        Self {
            message: "Cleanup completed",
            deleted_files: report.deleted(),
            deleted_artifacts: report.deleted_artifacts,
            deleted_transients: report.deleted_transients,
            failed: report.failed,
            max_age_hours,
        }
    }
}
