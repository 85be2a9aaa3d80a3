//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::EngineError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const INTERNAL_ERROR: i32 = 500;
    pub const SERVICE_UNAVAILABLE: i32 = 503;
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn errno(&self) -> i32 {
        match self {
            ApiError::NotFound(_) => errno::NOT_FOUND,
            ApiError::BadRequest(_) => errno::BAD_REQUEST,
            ApiError::Internal(_) => errno::INTERNAL_ERROR,
            ApiError::ServiceUnavailable(_) => errno::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.errno();
        let msg = match self {
            ApiError::NotFound(msg) => {
                tracing::warn!(errno = code, error = %msg, "Resource not found");
                msg
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = code, error = %msg, "Bad request");
                msg
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = code, error = %msg, "Internal server error");
                msg
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(errno = code, error = %msg, "Service unavailable");
                msg
            }
        };

        (StatusCode::OK, Json(ErrorResponse::new(code, msg))).into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::MissingBaseVoice { .. } => ApiError::NotFound(e.to_string()),
            EngineError::SynthesisFailed { .. } => ApiError::ServiceUnavailable(e.to_string()),
            EngineError::Validation(msg) => ApiError::BadRequest(msg),
            EngineError::Codec(_) | EngineError::Io(_) | EngineError::Internal(_) => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SynthesisError;
    use std::path::PathBuf;

    #[test]
    fn test_engine_error_mapping() {
        let missing: ApiError = EngineError::MissingBaseVoice {
            path: PathBuf::from("kenny.wav"),
        }
        .into();
        assert_eq!(missing.errno(), errno::NOT_FOUND);

        let synth: ApiError = EngineError::SynthesisFailed {
            speaker: "Cleopatra".to_string(),
            text_len: 12,
            source: SynthesisError::Timeout,
        }
        .into();
        assert_eq!(synth.errno(), errno::SERVICE_UNAVAILABLE);

        let empty: ApiError = EngineError::validation("Text must not be empty").into();
        assert_eq!(empty.errno(), errno::BAD_REQUEST);

        let internal: ApiError = EngineError::internal("fft").into();
        assert_eq!(internal.errno(), errno::INTERNAL_ERROR);
    }
}
