use crate::config::ModelConfig;
use crate::services::providers::{ProviderError, TextProvider};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompletionError {
    /// Both attempts failed. Only the first error is reported to callers.
    #[error("Failed with both model versions. Original error: {first}")]
    BothAttemptsFailed {
        first: ProviderError,
        second: ProviderError,
    },
}

/// Issues a completion request and retries it exactly once on failure.
///
/// The retry goes to `models.fallback`, which is the same model as the first attempt
/// unless configured otherwise. There is no delay between attempts.
pub struct CompletionClient {
    provider: Arc<dyn TextProvider>,
    models: ModelConfig,
}

impl CompletionClient {
    pub fn new(provider: Arc<dyn TextProvider>, models: ModelConfig) -> Self {
        Self { provider, models }
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let first = match self.provider.generate(prompt, &self.models.primary).await {
            Ok(text) => return Ok(text),
            Err(e) => e,
        };

        tracing::warn!(
            model = %self.models.primary,
            error = %first,
            "First model attempt failed"
        );

        match self.provider.generate(prompt, &self.models.fallback).await {
            Ok(text) => Ok(text),
            Err(second) => {
                tracing::warn!(
                    model = %self.models.fallback,
                    error = %second,
                    "Second model attempt failed"
                );
                Err(CompletionError::BothAttemptsFailed { first, second })
            }
        }
    }
}
