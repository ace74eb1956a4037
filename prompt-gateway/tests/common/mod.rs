//! Shared setup for prompt-gateway integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use prompt_gateway::config::GatewayConfig;
use prompt_gateway::services::providers::TextProvider;
use prompt_gateway::services::CompletionClient;
use prompt_gateway::startup::build_router;
use prompt_gateway::AppState;
use service_core::config::Config;
use std::collections::HashMap;
use std::sync::Arc;

pub const TEST_API_KEY: &str = "test-api-key";

/// Configuration with a test key on a random port, plus any overrides.
pub fn test_config(overrides: &[(&str, &str)]) -> GatewayConfig {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("GEMINI_API_KEY".to_string(), TEST_API_KEY.to_string());
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }

    GatewayConfig::from_lookup(Config { port: 0 }, |key| vars.get(key).cloned())
        .expect("test configuration should load")
}

pub fn router_with(provider: Arc<dyn TextProvider>) -> Router {
    let config = test_config(&[]);
    let completion = CompletionClient::new(provider, config.models.clone());
    build_router(AppState::new(config, completion))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
