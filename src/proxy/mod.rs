//! Provider adapters
//!
//! Each adapter forwards a message list to one vendor's token counting API
//! and hands back that vendor's raw response. The dispatcher collapses the
//! raw response into a normalized count, so vendor shapes stop here.

pub mod anthropic;
pub mod google;
pub mod headers;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::registry::Provider;
use crate::tokens::types::Message;

pub use anthropic::{AnthropicClient, AnthropicCountResponse};
pub use google::{GoogleClient, GoogleCountResponse};

/// Raw provider response, tagged by vendor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCount {
    Anthropic(AnthropicCountResponse),
    Google(GoogleCountResponse),
}

impl ProviderCount {
    /// Normalized input token count
    pub fn input_tokens(&self) -> u64 {
        match self {
            ProviderCount::Anthropic(response) => response.input_tokens,
            ProviderCount::Google(response) => response.total_tokens,
        }
    }
}

/// Failure of a single provider call
///
/// `message` is the vendor's own text when one could be recovered; `status`
/// is the upstream HTTP status when the vendor answered at all.
#[derive(Debug, Clone, Error)]
#[error("{}", .message.as_deref().unwrap_or("provider call failed"))]
pub struct ProviderError {
    pub message: Option<String>,
    pub status: Option<u16>,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            status: None,
        }
    }

    pub fn with_status(message: Option<String>, status: u16) -> Self {
        Self {
            message,
            status: Some(status),
        }
    }
}

/// A vendor token counting API
#[async_trait]
pub trait TokenCountProvider: Send + Sync {
    /// Vendor served by this adapter
    fn provider(&self) -> Provider;

    /// Whether an API key is available
    fn is_configured(&self) -> bool;

    /// Count the input tokens of `messages` for `model`
    async fn count_tokens(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<ProviderCount, ProviderError>;
}

/// POST a JSON body and decode a JSON response, mapping every failure to
/// a [`ProviderError`]
pub(crate) async fn post_json<T, R>(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
    body: &T,
) -> Result<R, ProviderError>
where
    T: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = client
        .post(url)
        .headers(headers)
        .json(body)
        .send()
        .await
        .map_err(|e| {
            warn!(url = %url, error = %e, "Provider request failed");
            ProviderError::new(e.without_url().to_string())
        })?;

    let status = response.status();
    debug!(url = %url, status = %status, "Received provider response");

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        warn!(url = %url, status = %status, body = %text, "Provider returned an error");
        return Err(ProviderError::with_status(
            extract_error_message(&text),
            status.as_u16(),
        ));
    }

    response.json::<R>().await.map_err(|e| {
        warn!(url = %url, error = %e, "Failed to decode provider response");
        ProviderError::new(format!("Invalid response from provider: {}", e.without_url()))
    })
}

/// Pull `error.message` out of a vendor error body
///
/// Both vendors nest the message the same way.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(|message| message.as_str())
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// Join a base URL and path without doubling the slash
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
