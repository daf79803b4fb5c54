//! Request extraction for the generation routes.

use crate::models::{GenerateTextRequest, Upload};
use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        FromRequest, Multipart, Request,
    },
    http::{header, StatusCode},
    Form, Json,
};
use service_core::error::AppError;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
const PROMPT_FIELD: &str = "prompt";

/// Prompt body accepted as JSON or as an urlencoded form.
///
/// Any other content type is read as an empty body, so the handler reports
/// the missing prompt rather than a content-type error.
pub struct PromptBody(pub GenerateTextRequest);

#[axum::async_trait]
impl<S> FromRequest<S> for PromptBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mime = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if mime == "application/json" || mime.ends_with("+json") {
            let Json(body) = Json::<GenerateTextRequest>::from_request(req, state)
                .await
                .map_err(|e| body_error(e.status(), e.body_text()))?;
            Ok(PromptBody(body))
        } else if mime == "application/x-www-form-urlencoded" {
            let Form(body) = Form::<GenerateTextRequest>::from_request(req, state)
                .await
                .map_err(|e| body_error(e.status(), e.body_text()))?;
            Ok(PromptBody(body))
        } else {
            Ok(PromptBody(GenerateTextRequest::default()))
        }
    }
}

fn body_error(status: StatusCode, text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge
    } else {
        AppError::BadRequest(anyhow::anyhow!(text))
    }
}

/// Fields collected from a single-file multipart upload.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<Upload>,
    pub prompt: Option<String>,
}

/// Reads the file field named `file_field` and an optional `prompt` field.
///
/// Only a part carrying a filename counts as the file; a plain text field
/// with the same name is ignored. Other fields and repeated file fields are
/// skipped. A request that is not
/// multipart at all yields an empty form. Files larger than `max_bytes` are
/// rejected with [`AppError::PayloadTooLarge`].
pub async fn read_upload_form(
    multipart: Result<Multipart, MultipartRejection>,
    file_field: &str,
    max_bytes: usize,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Request is not multipart");
            return Ok(form);
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(name)
                if name == file_field && field.file_name().is_some() && form.file.is_none() =>
            {
                form.file = Some(read_file(field, max_bytes).await?);
            }
            Some(PROMPT_FIELD) => {
                form.prompt = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_file(mut field: Field<'_>, max_bytes: usize) -> Result<Upload, AppError> {
    let mime_type = field
        .content_type()
        .filter(|ct| !ct.is_empty())
        .unwrap_or(DEFAULT_MIME_TYPE)
        .to_string();

    let mut data = Vec::new();
    let mut received = 0usize;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        received += chunk.len();
        // Past the limit the field is drained without buffering
        if received <= max_bytes {
            data.extend_from_slice(&chunk);
        }
    }

    if received > max_bytes {
        tracing::warn!(received, max_bytes, "Upload exceeds size limit");
        return Err(AppError::PayloadTooLarge);
    }

    Ok(Upload { data, mime_type })
}

fn multipart_error(err: MultipartError) -> AppError {
    body_error(err.status(), err.body_text())
}
