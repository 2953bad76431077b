//! Tokenscope - token counting proxy for chat models
//!
//! Accepts a conversation and a model id, forwards it to the token counting
//! API of the provider that owns the model, and returns a normalized count.

pub mod config;
pub mod docs;
pub mod error;
pub mod proxy;
pub mod registry;
pub mod routes;
pub mod tokens;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

pub use crate::config::Config;
pub use crate::proxy::{AnthropicClient, GoogleClient, TokenCountProvider};
pub use crate::registry::{ModelEntry, ModelRegistry, Provider};
pub use crate::tokens::Dispatcher;

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Routes count requests to provider adapters
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Result<Self> {
        let registry = match &config.models_file {
            Some(path) => ModelRegistry::from_json_file(path)
                .with_context(|| format!("Failed to load model registry from {}", path))?,
            None => ModelRegistry::default(),
        };
        info!(
            models = registry.len(),
            supported = %registry.supported_ids(),
            "Model registry loaded"
        );

        // One pooled client shared by both adapters
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(16);
        if let Some(timeout) = config.provider_timeout() {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let anthropic: Arc<dyn TokenCountProvider> =
            Arc::new(AnthropicClient::new(http_client.clone(), &config));
        let google: Arc<dyn TokenCountProvider> =
            Arc::new(GoogleClient::new(http_client, &config));

        let dispatcher = Arc::new(Dispatcher::new(Arc::new(registry), anthropic, google));

        Ok(Self::with_dispatcher(config, dispatcher))
    }

    /// Create application state around an existing dispatcher
    ///
    /// Lets tests substitute fake or mock-backed adapters.
    pub fn with_dispatcher(config: Config, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            dispatcher,
        }
    }
}
