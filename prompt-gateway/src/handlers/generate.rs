use axum::extract::{Query, State};
use bytes::Bytes;
use serde::Deserialize;
use service_core::error::AppError;

use crate::AppState;

pub const PROMPT_REQUIRED: &str = "Prompt is required";

#[derive(Debug, Default, Deserialize)]
pub struct PromptParams {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// `GET /generate-content?prompt=...`
///
/// A query string that does not parse is treated like a missing prompt.
pub async fn generate_content_get(
    State(state): State<AppState>,
    query: Option<Query<PromptParams>>,
) -> Result<String, AppError> {
    let prompt = query.and_then(|Query(params)| params.prompt);
    generate(&state, prompt).await
}

/// `POST /generate-content` with `{"prompt": "..."}`.
///
/// The body is read as raw bytes so that a missing content type, malformed JSON or a
/// non-string `prompt` all end up as the same 400 instead of an extractor rejection.
pub async fn generate_content_post(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, AppError> {
    let params: PromptParams = serde_json::from_slice(&body).unwrap_or_default();
    generate(&state, params.prompt).await
}

async fn generate(state: &AppState, prompt: Option<String>) -> Result<String, AppError> {
    let prompt = prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest(PROMPT_REQUIRED.to_string()))?;

    tracing::info!(prompt_len = prompt.len(), "Generating content");
    tracing::debug!(prompt = %prompt, "Prompt received");

    match state.completion.complete(&prompt).await {
        Ok(text) => {
            tracing::info!(response_len = text.len(), "Generated response");
            Ok(text)
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                api_key_hint = %state.config.api_key_hint(),
                "Content generation failed"
            );
            Err(AppError::UpstreamError(format!(
                "Error generating content: {}",
                e
            )))
        }
    }
}
