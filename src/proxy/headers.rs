//! Header construction for provider requests
//!
//! Client headers are never forwarded; each request carries only the
//! vendor credentials and a JSON content type.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use super::ProviderError;

const ANTHROPIC_API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");
const ANTHROPIC_VERSION_HEADER: HeaderName = HeaderName::from_static("anthropic-version");
const GOOGLE_API_KEY_HEADER: HeaderName = HeaderName::from_static("x-goog-api-key");

/// Headers for the Anthropic API
pub fn build_anthropic_headers(api_key: &str, version: &str) -> Result<HeaderMap, ProviderError> {
    let mut headers = HeaderMap::new();
    headers.insert(ANTHROPIC_API_KEY_HEADER, secret_value(api_key)?);
    headers.insert(
        ANTHROPIC_VERSION_HEADER,
        HeaderValue::from_str(version)
            .map_err(|_| ProviderError::new("Invalid ANTHROPIC_VERSION value"))?,
    );
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Headers for the Google Generative Language API
pub fn build_google_headers(api_key: &str) -> Result<HeaderMap, ProviderError> {
    let mut headers = HeaderMap::new();
    headers.insert(GOOGLE_API_KEY_HEADER, secret_value(api_key)?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn secret_value(api_key: &str) -> Result<HeaderValue, ProviderError> {
    let mut value = HeaderValue::from_str(api_key)
        .map_err(|_| ProviderError::new("Invalid API key format"))?;
    value.set_sensitive(true);
    Ok(value)
}
