use super::extract::{read_upload_form, PromptBody, UploadForm};
use crate::models::{GenerationRequest, GenerationResponse, Upload};
use crate::startup::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use service_core::error::AppError;

pub async fn generate_text(
    State(state): State<AppState>,
    PromptBody(body): PromptBody,
) -> Result<Json<GenerationResponse>, AppError> {
    let prompt = body
        .prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("Prompt is required")))?;

    respond(&state, GenerationRequest::TextPrompt(prompt)).await
}

pub async fn generate_from_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let (upload, prompt) =
        required_upload(&state, multipart, "image", "Image is required").await?;

    respond(&state, GenerationRequest::Image { upload, prompt }).await
}

pub async fn generate_from_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let (upload, prompt) =
        required_upload(&state, multipart, "document", "Document is required").await?;

    respond(&state, GenerationRequest::Document { upload, prompt }).await
}

pub async fn generate_from_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let (upload, prompt) =
        required_upload(&state, multipart, "audio", "Audio is required").await?;

    respond(&state, GenerationRequest::Audio { upload, prompt }).await
}

async fn required_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
    field: &str,
    missing_message: &'static str,
) -> Result<(Upload, Option<String>), AppError> {
    let UploadForm { file, prompt } =
        read_upload_form(multipart, field, state.config.uploads.max_file_size_bytes).await?;

    let upload = file.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!(missing_message)))?;

    tracing::info!(
        field,
        size = upload.data.len(),
        mime_type = %upload.mime_type,
        "Upload received"
    );

    Ok((upload, prompt))
}

async fn respond(
    state: &AppState,
    request: GenerationRequest,
) -> Result<Json<GenerationResponse>, AppError> {
    let result = state.generation.generate(request).await?;
    Ok(Json(GenerationResponse { result }))
}
