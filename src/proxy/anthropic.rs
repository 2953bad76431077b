//! Anthropic token counting adapter
//!
//! Calls `POST /v1/messages/count_tokens`. Messages use Anthropic's native
//! role/content shape already, so they are forwarded unchanged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{
    headers::build_anthropic_headers, join_url, post_json, ProviderCount, ProviderError,
    TokenCountProvider,
};
use crate::{config::Config, registry::Provider, tokens::types::Message};

const COUNT_TOKENS_PATH: &str = "/v1/messages/count_tokens";

/// Request body for the count tokens endpoint
#[derive(Debug, Serialize)]
pub struct AnthropicCountRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
}

/// Response body of the count tokens endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnthropicCountResponse {
    pub input_tokens: u64,
}

/// Anthropic API client
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    version: String,
}

impl AnthropicClient {
    /// Create a new Anthropic client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.anthropic_api_url.clone(),
            api_key: config.anthropic_api_key.clone(),
            version: config.anthropic_version.clone(),
        }
    }
}

#[async_trait]
impl TokenCountProvider for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self, messages), fields(provider = "anthropic", message_count = messages.len()))]
    async fn count_tokens(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<ProviderCount, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::new("ANTHROPIC_API_KEY is not configured"))?;

        let url = join_url(&self.base_url, COUNT_TOKENS_PATH);
        let headers = build_anthropic_headers(api_key, &self.version)?;
        let body = AnthropicCountRequest { model, messages };

        let response: AnthropicCountResponse =
            post_json(&self.client, &url, headers, &body).await?;

        info!(input_tokens = response.input_tokens, "Anthropic token count received");
        Ok(ProviderCount::Anthropic(response))
    }
}
