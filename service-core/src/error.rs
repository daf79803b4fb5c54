use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(anyhow::Error),

    #[error("{0}")]
    Forbidden(anyhow::Error),

    #[error("File too large")]
    PayloadTooLarge,

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Upstream(_) | AppError::InternalError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// JSON body for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let message = match self {
            AppError::InternalError(err) => {
                let text = err.to_string();
                if text.is_empty() {
                    INTERNAL_SERVER_ERROR.to_string()
                } else {
                    text
                }
            }
            AppError::Upstream(msg) if msg.is_empty() => INTERNAL_SERVER_ERROR.to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn test_bad_request_uses_message_verbatim() {
        let (status, body) =
            body_json(AppError::BadRequest(anyhow::anyhow!("Prompt is required"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "message": "Prompt is required" }));
    }

    #[tokio::test]
    async fn test_payload_too_large() {
        let (status, body) = body_json(AppError::PayloadTooLarge).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["message"], "File too large");
    }

    #[tokio::test]
    async fn test_forbidden() {
        let (status, body) =
            body_json(AppError::Forbidden(anyhow::anyhow!("Not allowed by CORS"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Not allowed by CORS");
    }

    #[tokio::test]
    async fn test_empty_internal_error_falls_back() {
        let (status, body) = body_json(AppError::Upstream(String::new())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal Server Error");

        let (_, body) = body_json(AppError::InternalError(anyhow::anyhow!(""))).await;
        assert_eq!(body["message"], "Internal Server Error");
    }

    #[tokio::test]
    async fn test_upstream_error_text_is_surfaced() {
        let (status, body) = body_json(AppError::Upstream("model overloaded".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "model overloaded");
    }
}
