//! Voice HTTP Handlers

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequest, Multipart, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Form, Json,
};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::application::{GenerateSpeech, ListVoices, VoiceListResponse};
use crate::domain::naming;
use crate::infrastructure::http::dto::{ApiResponse, GenerateRequest};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 列出所有音色及文件状态
pub async fn list_voices(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<VoiceListResponse>> {
    let voices = state.list_voices_handler.handle(ListVoices).await;
    Json(ApiResponse::success(voices))
}

/// 生成请求提取器，同时接受 urlencoded 和 multipart 表单
pub struct GenerateForm(pub GenerateRequest);

#[async_trait]
impl<S> FromRequest<S> for GenerateForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(request) = Form::<GenerateRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            return Ok(Self(request));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        let mut text = None;
        let mut speaker = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?
        {
            let name = field.name().map(str::to_owned);
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            match name.as_deref() {
                Some("text") => text = Some(value),
                Some("speaker") => speaker = Some(value),
                _ => {}
            }
        }

        let text = text.ok_or_else(|| ApiError::BadRequest("Missing form field: text".to_string()))?;
        Ok(Self(GenerateRequest {
            text,
            speaker: speaker.unwrap_or_else(|| crate::domain::voice::DEFAULT_VOICE.to_string()),
        }))
    }
}

/// 非法字符（如非 ASCII 的说话人名）按 URL 编码写入响应头
fn header_value(value: impl AsRef<str>) -> HeaderValue {
    let value = value.as_ref();
    HeaderValue::from_str(value)
        .or_else(|_| {
            tracing::debug!(value = %value, "Header value percent-encoded");
            HeaderValue::from_str(&urlencoding::encode(value))
        })
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// 生成语音并直接返回 WAV 文件
pub async fn generate(
    State(state): State<Arc<AppState>>,
    GenerateForm(req): GenerateForm,
) -> Result<Response, ApiError> {
    let artifact = state
        .generate_handler
        .handle(GenerateSpeech {
            speaker: req.speaker,
            text: req.text,
        })
        .await?;

    let file = tokio::fs::File::open(&artifact.path)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to open generated audio: {}", e)))?;
    let file_size = file
        .metadata()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to get file metadata: {}", e)))?
        .len();

    let body = Body::from_stream(ReaderStream::new(file));

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/wav")
        .header(header::CONTENT_LENGTH, file_size)
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}_voice.wav\"",
                naming::speaker_slug(&artifact.speaker)
            ),
        )
        .body(body)
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))?;

    let headers = response.headers_mut();
    headers.insert(
        "x-generation-time",
        header_value(format!("{:.3}", artifact.generation_duration_secs)),
    );
    headers.insert("x-text-length", header_value(artifact.text_length.to_string()));
    headers.insert("x-speaker", header_value(&artifact.speaker));
    headers.insert(
        "x-pitch-shift",
        header_value(artifact.pitch_shift_applied.to_string()),
    );
    headers.insert("x-voice-type", header_value(artifact.source_kind.as_str()));
    headers.insert("x-artifact-id", header_value(&artifact.id));
    if let Some(warning) = &artifact.reference_warning {
        headers.insert("x-reference-warning", header_value(warning));
    }

    Ok(response)
}
