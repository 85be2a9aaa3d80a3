//! Health Handler

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::{GetHealth, HealthResponse};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::state::AppState;

/// 基础音色与合成器可用性
pub async fn health(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthResponse>> {
    let health = state.health_handler.handle(GetHealth).await;
    Json(ApiResponse::success(health))
}
