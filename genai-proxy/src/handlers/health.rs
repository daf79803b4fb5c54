use crate::models::{HealthResponse, StatusResponse};
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, Json};

pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse { status: "ok" })
}

/// Liveness probe.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "genai-proxy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness probe: the upstream provider must accept our credentials.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match state.generation.provider().health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Upstream provider not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
