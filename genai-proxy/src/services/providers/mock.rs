//! Mock provider implementation for testing.

use super::{ProviderError, TextProvider};
use crate::models::ContentPart;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Mock text provider that replays a fixed script of outcomes.
///
/// Once the script is exhausted every call returns `fallback`. All received
/// part lists are recorded for assertions.
pub struct MockTextProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    fallback: Result<String, ProviderError>,
    calls: Mutex<Vec<Vec<ContentPart>>>,
}

impl MockTextProvider {
    pub fn new(
        script: impl IntoIterator<Item = Result<String, ProviderError>>,
        fallback: Result<String, ProviderError>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `text`.
    pub fn replying(text: &str) -> Self {
        Self::new([], Ok(text.to_string()))
    }

    /// Always fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::new([], Err(error))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }

    /// Parts received by each call, in order.
    pub fn calls(&self) -> Vec<Vec<ContentPart>> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, parts: &[ContentPart]) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(parts.to_vec());
        }

        let scripted = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front());

        scripted.unwrap_or_else(|| self.fallback.clone())
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.fallback {
            Err(ProviderError::NotConfigured(msg)) => {
                Err(ProviderError::NotConfigured(msg.clone()))
            }
            _ => Ok(()),
        }
    }
}
