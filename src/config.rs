//! Configuration management for Tokenscope
//!
//! Configuration is loaded from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Anthropic API base URL
    pub anthropic_api_url: String,
    /// Anthropic API key. Calls fail at invocation time when unset.
    pub anthropic_api_key: Option<String>,
    /// Value of the `anthropic-version` header
    pub anthropic_version: String,

    /// Google Generative Language API base URL
    pub google_api_url: String,
    /// Google API key. Calls fail at invocation time when unset.
    pub google_api_key: Option<String>,

    /// Timeout for a single provider call (in seconds, 0 disables)
    pub provider_timeout_seconds: u64,

    /// Optional JSON file replacing the built-in model registry
    pub models_file: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: env::var("TOKENSCOPE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("TOKENSCOPE_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid TOKENSCOPE_PORT")?,

            anthropic_api_url: env::var("ANTHROPIC_API_URL")
                .unwrap_or_else(|_| "https://api.anthropic.com".to_string()),
            anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
            anthropic_version: env::var("ANTHROPIC_VERSION")
                .unwrap_or_else(|_| "2023-06-01".to_string()),

            google_api_url: env::var("GOOGLE_API_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            google_api_key: non_empty_var("GOOGLE_API_KEY"),

            provider_timeout_seconds: env::var("PROVIDER_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("Invalid PROVIDER_TIMEOUT_SECONDS")?,

            models_file: non_empty_var("TOKENSCOPE_MODELS_FILE"),
        })
    }

    /// Provider call timeout, `None` when disabled
    pub fn provider_timeout(&self) -> Option<Duration> {
        (self.provider_timeout_seconds > 0)
            .then(|| Duration::from_secs(self.provider_timeout_seconds))
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
