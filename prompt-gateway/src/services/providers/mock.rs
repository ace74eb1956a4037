//! Mock provider implementation for testing.

use super::{ProviderError, TextProvider};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A `(prompt, model)` pair seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub model: String,
}

/// Mock text provider that replays scripted outcomes in order.
#[derive(Default)]
pub struct MockTextProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTextProvider {
    pub fn new(script: impl IntoIterator<Item = Result<String, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// One-entry script answering with `text`.
    pub fn succeeding(text: impl Into<String>) -> Self {
        Self::new([Ok(text.into())])
    }

    /// Script of `times` upstream API errors carrying `message`.
    pub fn failing(message: impl Into<String>, times: usize) -> Self {
        let message = message.into();
        Self::new((0..times).map(|_| Err(ProviderError::ApiError(message.clone()))))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                model: model.to_string(),
            });
        }

        self.script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| {
                Err(ProviderError::NotConfigured(
                    "Mock text provider script exhausted".to_string(),
                ))
            })
    }
}
