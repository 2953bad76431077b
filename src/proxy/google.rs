//! Google token counting adapter
//!
//! Calls `POST /v1beta/models/{model}:countTokens` on the Generative
//! Language API. Gemini names the assistant role `model` and wraps text in
//! parts, so messages are translated before sending.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{
    headers::build_google_headers, join_url, post_json, ProviderCount, ProviderError,
    TokenCountProvider,
};
use crate::{
    config::Config,
    registry::Provider,
    tokens::types::{Message, Role},
};

/// Gemini content role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoogleRole {
    User,
    Model,
}

impl From<Role> for GoogleRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => GoogleRole::User,
            Role::Assistant => GoogleRole::Model,
        }
    }
}

/// Text part of a content entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GooglePart {
    pub text: String,
}

/// A single Gemini content entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleContent {
    pub role: GoogleRole,
    pub parts: Vec<GooglePart>,
}

impl From<&Message> for GoogleContent {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.into(),
            parts: vec![GooglePart {
                text: message.content.clone(),
            }],
        }
    }
}

/// Request body for the countTokens method
#[derive(Debug, Serialize)]
pub struct GoogleCountRequest {
    pub contents: Vec<GoogleContent>,
}

impl GoogleCountRequest {
    pub fn from_messages(messages: &[Message]) -> Self {
        Self {
            contents: messages.iter().map(GoogleContent::from).collect(),
        }
    }
}

/// Response body of the countTokens method
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCountResponse {
    pub total_tokens: u64,
}

/// Google Generative Language API client
pub struct GoogleClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleClient {
    /// Create a new Google client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.google_api_url.clone(),
            api_key: config.google_api_key.clone(),
        }
    }

    fn count_tokens_url(&self, model: &str) -> String {
        join_url(&self.base_url, &format!("/v1beta/models/{}:countTokens", model))
    }
}

#[async_trait]
impl TokenCountProvider for GoogleClient {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip(self, messages), fields(provider = "google", message_count = messages.len()))]
    async fn count_tokens(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<ProviderCount, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::new("GOOGLE_API_KEY is not configured"))?;

        let url = self.count_tokens_url(model);
        let headers = build_google_headers(api_key)?;
        let body = GoogleCountRequest::from_messages(messages);

        let response: GoogleCountResponse = post_json(&self.client, &url, headers, &body).await?;

        info!(total_tokens = response.total_tokens, "Google token count received");
        Ok(ProviderCount::Google(response))
    }
}
