//! The four generation endpoints.
//!
//! Each handler validates its input, spools any upload to a temp file,
//! delegates to the injected Model Client, and shapes the response. The
//! temp file is removed before the response is sent, whatever the outcome.

use crate::dtos::{
    AudioResponse, GenerateTextRequest, GenerateTextResponse, GenerationFailure, MediaResponse,
};
use crate::services::providers::ProviderError;
use crate::services::TempUpload;
use crate::startup::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;

const DEFAULT_IMAGE_PROMPT: &str = "Describe the image";
const DOCUMENT_INSTRUCTION: &str = "Analyze this document:";
const AUDIO_INSTRUCTION: &str = "Transcribe and analyze this audio:";

/// Advisory hints returned alongside document/audio failures. Nothing is
/// enforced against these lists.
const SUPPORTED_DOCUMENT_TYPES: &[&str] = &["application/pdf", "text/plain"];
const SUPPORTED_AUDIO_FORMATS: &[&str] = &["audio/mpeg", "audio/wav", "audio/webm"];

/// POST /generate-text
pub async fn generate_text(
    State(state): State<AppState>,
    Json(body): Json<GenerateTextRequest>,
) -> Result<impl IntoResponse, AppError> {
    // The prompt must be a JSON string and non-empty after trimming;
    // anything else is rejected before the model is consulted.
    let prompt = match body.prompt {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
        _ => {
            return Err(AppError::BadRequest(
                "Prompt is required and must be a non-empty string".to_string(),
            ))
        }
    };

    let text = state
        .provider
        .generate(&prompt, &[])
        .await
        .map_err(map_text_error)?;

    Ok(Json(GenerateTextResponse {
        generated_text: text,
    }))
}

/// POST /generate-from-image
pub async fn generate_from_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_media_form(multipart, "image", &state.config.storage.upload_path).await?;
    let Some(upload) = form.upload else {
        return Err(AppError::BadRequest("No image file uploaded".to_string()));
    };
    let prompt = form
        .prompt
        .unwrap_or_else(|| DEFAULT_IMAGE_PROMPT.to_string());

    let outcome = generate_with_upload(&state, &prompt, &upload).await;
    upload.remove().await;

    match outcome {
        Ok(text) => Ok(Json(MediaResponse { output: text }).into_response()),
        Err(e) => {
            tracing::error!(error = %e, "Error processing image");
            Ok(failure_response(GenerationFailure::new(e.to_string())))
        }
    }
}

/// POST /generate-from-document
pub async fn generate_from_document(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_media_form(multipart, "document", &state.config.storage.upload_path).await?;
    let Some(upload) = form.upload else {
        return Err(AppError::BadRequest("No document file uploaded".to_string()));
    };

    let outcome = generate_with_upload(&state, DOCUMENT_INSTRUCTION, &upload).await;
    upload.remove().await;

    match outcome {
        Ok(text) => Ok(Json(MediaResponse { output: text }).into_response()),
        Err(e) => {
            tracing::error!(error = %e, "Document processing error");
            Ok(failure_response(GenerationFailure::with_supported_docs(
                e.to_string(),
                SUPPORTED_DOCUMENT_TYPES,
            )))
        }
    }
}

/// POST /generate-from-audio
pub async fn generate_from_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let form = read_media_form(multipart, "audio", &state.config.storage.upload_path).await?;
    let Some(upload) = form.upload else {
        return Err(AppError::BadRequest("No audio file uploaded".to_string()));
    };
    let audio_format = upload.mime_type().to_string();

    let outcome = generate_with_upload(&state, AUDIO_INSTRUCTION, &upload).await;
    upload.remove().await;

    match outcome {
        Ok(text) => Ok(Json(AudioResponse {
            transcript: text,
            audio_format,
        })
        .into_response()),
        Err(e) => {
            tracing::error!(error = %e, "Audio processing error");
            Ok(failure_response(GenerationFailure::with_supported_formats(
                e.to_string(),
                SUPPORTED_AUDIO_FORMATS,
            )))
        }
    }
}

/// Encode the spooled upload and run one generation against it.
async fn generate_with_upload(
    state: &AppState,
    prompt: &str,
    upload: &TempUpload,
) -> anyhow::Result<String> {
    let part = upload.to_inline_part().await?;
    let text = state
        .provider
        .generate(prompt, std::slice::from_ref(&part))
        .await?;
    Ok(text)
}

/// Provider-error mapping for the text endpoint. The other endpoints
/// collapse every provider failure to 500.
fn map_text_error(e: ProviderError) -> AppError {
    match e {
        ProviderError::Unreachable(msg) => {
            tracing::error!(error = %msg, "Model service unreachable");
            AppError::ServiceUnavailable("Model service unavailable".to_string())
        }
        ProviderError::Unauthorized => {
            AppError::Unauthorized("Unauthorized access to model API".to_string())
        }
        ProviderError::Malformed(msg) => {
            tracing::error!(error = %msg, "Invalid response format from model");
            AppError::BadGateway("Invalid response from model".to_string())
        }
        other => {
            tracing::error!(error = %other, "Error generating text");
            AppError::Internal("Failed to generate text".to_string())
        }
    }
}

fn failure_response(body: GenerationFailure) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

struct MediaForm {
    upload: Option<TempUpload>,
    prompt: Option<String>,
}

/// Walk the multipart form, spooling the named file field and capturing an
/// optional `prompt` text field. Unknown fields are skipped.
async fn read_media_form(
    mut multipart: Multipart,
    file_field: &str,
    upload_dir: &str,
) -> Result<MediaForm, AppError> {
    let mut upload = None;
    let mut prompt = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().map(str::to_string);

        match name.as_deref() {
            Some(n) if n == file_field => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file bytes: {}", e))
                })?;
                upload = Some(TempUpload::spool(upload_dir, &data, mime_type).await?);
            }
            Some("prompt") => {
                prompt = Some(field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read prompt field: {}", e))
                })?);
            }
            _ => {}
        }
    }

    Ok(MediaForm { upload, prompt })
}
