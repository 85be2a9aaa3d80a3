//! Cleanup Handler

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;
use std::time::Duration;

use crate::application::SweepArtifacts;
use crate::infrastructure::http::dto::{ApiResponse, CleanupQuery, CleanupResponse};
use crate::infrastructure::http::state::AppState;

/// 手动触发清理
pub async fn cleanup(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CleanupQuery>,
) -> Json<ApiResponse<CleanupResponse>> {
    let max_age = Duration::from_secs(query.max_age_hours.saturating_mul(3600));
    let report = state
        .sweep_handler
        .handle(SweepArtifacts {
            max_age: Some(max_age),
        })
        .await;

    Json(ApiResponse::success(CleanupResponse::new(
        report,
        query.max_age_hours,
    )))
}
