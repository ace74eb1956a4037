//! Gemini AI provider implementation.
//!
//! Implements text generation against the `generateContent` method of Google's
//! Generative Language REST API.

use super::{ProviderError, TextProvider};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Finish reasons for which the candidate carries no usable text.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub api_base: String,
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        // No request timeout: the call waits for whatever the transport gives back.
        let client = Client::builder().build().map_err(|e| {
            ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the given model and method. The key travels as a query parameter.
    fn api_url(&self, model: &str, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            model,
            method
        )
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(&self, prompt: &str, model: &str) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        tracing::debug!(
            model = %model,
            prompt_len = prompt.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(self.api_url(model, "generateContent"))
            .query(&[("key", self.config.api_key.expose_secret().as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::ApiError(format!(
                "[{}] {}",
                status,
                api_error_message(&body)
            )));
        }

        let api_response: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            ProviderError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        extract_text(api_response)
    }
}

/// Pulls `error.message` out of Google's error envelope, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, ProviderError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(ProviderError::Blocked(format!(
            "prompt blocked due to {}",
            reason
        )));
    }

    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        ProviderError::InvalidResponse("response contained no candidates".to_string())
    })?;

    if let Some(reason) = candidate
        .finish_reason
        .as_deref()
        .filter(|reason| BLOCKING_FINISH_REASONS.contains(reason))
    {
        return Err(ProviderError::Blocked(format!(
            "candidate finished with {}",
            reason
        )));
    }

    Ok(candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default())
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_serializes_as_single_user_turn() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some("Hello".to_string()),
                }],
            }],
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"contents": [{"role": "user", "parts": [{"text": "Hello"}]}]})
        );
    }

    #[test]
    fn text_parts_are_concatenated_in_order() {
        let response = parse(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hel"}, {"text": "lo"}]},
                "finishReason": "STOP"
            }]
        }));

        assert_eq!(extract_text(response).unwrap(), "Hello");
    }

    #[test]
    fn only_first_candidate_is_used() {
        let response = parse(json!({
            "candidates": [
                {"content": {"parts": [{"text": "first"}]}},
                {"content": {"parts": [{"text": "second"}]}}
            ]
        }));

        assert_eq!(extract_text(response).unwrap(), "first");
    }

    #[test]
    fn blocked_prompt_is_an_error() {
        let response = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}}));

        assert_eq!(
            extract_text(response).unwrap_err(),
            ProviderError::Blocked("prompt blocked due to SAFETY".to_string())
        );
    }

    #[test]
    fn safety_finish_reason_is_an_error() {
        let response = parse(json!({"candidates": [{"finishReason": "SAFETY"}]}));

        assert!(matches!(
            extract_text(response),
            Err(ProviderError::Blocked(_))
        ));
    }

    #[test]
    fn max_tokens_finish_still_returns_text() {
        let response = parse(json!({
            "candidates": [{"content": {"parts": [{"text": "partial"}]}, "finishReason": "MAX_TOKENS"}]
        }));

        assert_eq!(extract_text(response).unwrap(), "partial");
    }

    #[test]
    fn missing_candidates_is_invalid() {
        let response = parse(json!({}));

        assert!(matches!(
            extract_text(response),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn error_message_prefers_google_envelope() {
        let body = r#"{"error": {"code": 429, "message": "quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(api_error_message(body), "quota exceeded");
        assert_eq!(api_error_message("  upstream down \n"), "upstream down");
    }

    #[test]
    fn empty_key_is_rejected() {
        let result = GeminiTextProvider::new(GeminiConfig {
            api_key: Secret::new(String::new()),
            api_base: "http://localhost".to_string(),
        });

        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn api_url_joins_base_model_and_method() {
        let provider = GeminiTextProvider::new(GeminiConfig {
            api_key: Secret::new("key".to_string()),
            api_base: "http://localhost:1234/v1beta/".to_string(),
        })
        .unwrap();

        assert_eq!(
            provider.api_url("gemini-1.5-pro", "generateContent"),
            "http://localhost:1234/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }
}
