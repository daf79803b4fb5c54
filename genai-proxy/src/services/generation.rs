//! Generation invoker: normalized request in, upstream text out.

use crate::config::PromptDefaults;
use crate::models::GenerationRequest;
use crate::services::providers::{ProviderError, TextProvider};
use service_core::error::AppError;
use service_core::retry::{retry_async, RetryConfig};
use std::sync::Arc;

#[derive(Clone)]
pub struct GenerationService {
    provider: Arc<dyn TextProvider>,
    defaults: PromptDefaults,
    retry: RetryConfig,
}

impl GenerationService {
    /// Uses the standard policy: up to 3 retries, 1s apart, on overload only.
    pub fn new(provider: Arc<dyn TextProvider>, defaults: PromptDefaults) -> Self {
        Self::with_retry(provider, defaults, RetryConfig::default())
    }

    pub fn with_retry(
        provider: Arc<dyn TextProvider>,
        defaults: PromptDefaults,
        retry: RetryConfig,
    ) -> Self {
        Self {
            provider,
            defaults,
            retry,
        }
    }

    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        &self.provider
    }

    pub async fn generate(&self, request: GenerationRequest) -> Result<String, AppError> {
        let kind = request.kind();
        let parts = request.into_parts(&self.defaults);

        let text = retry_async(
            &self.retry,
            "generate_content",
            ProviderError::is_transient,
            || self.provider.generate(&parts),
        )
        .await
        .map_err(|e| {
            tracing::error!(kind, error = %e, "Generation failed");
            AppError::Upstream(e.to_string())
        })?;

        tracing::info!(kind, result_len = text.len(), "Generation completed");

        Ok(text)
    }
}
