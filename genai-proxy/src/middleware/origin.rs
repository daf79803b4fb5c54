//! Browser origin checks.
//!
//! Requests without an `Origin` header (curl, server-to-server) are always
//! accepted. Browser requests are accepted when the allow-list is empty or
//! contains the exact origin.

use crate::config::CorsConfig;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const CORS_REJECTION: &str = "Not allowed by CORS";

#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    allowed_origins: Vec<String>,
    enforce: bool,
}

impl OriginPolicy {
    pub fn new(allowed_origins: Vec<String>, enforce: bool) -> Self {
        Self {
            allowed_origins,
            enforce,
        }
    }

    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            None => true,
            Some(origin) => {
                self.allowed_origins.is_empty()
                    || self.allowed_origins.iter().any(|o| o == origin)
            }
        }
    }

    pub fn enforces(&self) -> bool {
        self.enforce
    }
}

impl From<&CorsConfig> for OriginPolicy {
    fn from(config: &CorsConfig) -> Self {
        Self::new(config.allowed_origins.clone(), config.enforce)
    }
}

/// Rejects requests from disallowed origins with 403 when enforcement is on.
pub async fn origin_guard(
    State(policy): State<Arc<OriginPolicy>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if policy.enforces() {
        let origin = req.headers().get(header::ORIGIN);
        // A header that is not valid UTF-8 cannot match any configured origin
        let allowed = match origin {
            None => true,
            Some(value) => value
                .to_str()
                .map(|o| policy.is_allowed(Some(o)))
                .unwrap_or(false),
        };

        if !allowed {
            tracing::warn!(
                origin = ?origin,
                path = %req.uri().path(),
                "Rejected cross-origin request"
            );
            return Err(AppError::Forbidden(anyhow::anyhow!(CORS_REJECTION)));
        }
    }

    Ok(next.run(req).await)
}

/// CORS response headers for allowed origins.
pub fn cors_layer(policy: Arc<OriginPolicy>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts| {
                origin
                    .to_str()
                    .map(|o| policy.is_allowed(Some(o)))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
