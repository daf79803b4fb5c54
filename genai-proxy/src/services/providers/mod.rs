//! AI provider abstractions and implementations.
//!
//! The proxy talks to its upstream model through [`TextProvider`], so the
//! Gemini client can be swapped for a mock in tests.

pub mod gemini;
pub mod mock;

use crate::models::ContentPart;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Upstream reported 503: the model is temporarily overloaded.
    #[error("{0}")]
    Overloaded(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("{0}")]
    ApiError(String),

    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Only capacity errors are worth retrying; everything else fails fast.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::Overloaded(_))
    }
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate a text response from an ordered list of content parts.
    async fn generate(&self, parts: &[ContentPart]) -> Result<String, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
