//! Text-generation provider abstraction.
//!
//! The gateway only ever needs one capability from a model backend: turn a prompt into
//! text using a named model. Keeping it behind a trait lets the Gemini binding be swapped
//! for the scripted mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Error reported by the upstream API, message kept as received.
    #[error("{0}")]
    ApiError(String),

    #[error("Response was blocked: {0}")]
    Blocked(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Generate text for `prompt` with the model named `model`.
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, ProviderError>;
}
