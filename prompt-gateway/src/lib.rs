pub mod config;
pub mod handlers;
pub mod services;
pub mod startup;

use config::GatewayConfig;
use services::CompletionClient;
use std::sync::Arc;

/// Shared application state. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub completion: Arc<CompletionClient>,
}

impl AppState {
    pub fn new(config: GatewayConfig, completion: CompletionClient) -> Self {
        Self {
            config: Arc::new(config),
            completion: Arc::new(completion),
        }
    }
}
