//! Token count dispatcher
//!
//! Validates a count request, resolves the model to its provider through the
//! registry, calls that provider's adapter once, and collapses the vendor
//! response into a [`CountResponse`]. Each call is independent; the only
//! shared state is the immutable registry and the adapters.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::{
    error::{AppError, AppResult},
    proxy::{ProviderError, TokenCountProvider},
    registry::{ModelEntry, ModelRegistry, Provider},
    tokens::types::{CountRequest, CountResponse, Message},
};

/// Routes count requests to the adapter registered for each model
pub struct Dispatcher {
    registry: Arc<ModelRegistry>,
    anthropic: Arc<dyn TokenCountProvider>,
    google: Arc<dyn TokenCountProvider>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<ModelRegistry>,
        anthropic: Arc<dyn TokenCountProvider>,
        google: Arc<dyn TokenCountProvider>,
    ) -> Self {
        debug_assert_eq!(anthropic.provider(), Provider::Anthropic);
        debug_assert_eq!(google.provider(), Provider::Google);

        Self {
            registry,
            anthropic,
            google,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Adapter serving `provider`
    pub fn adapter(&self, provider: Provider) -> &dyn TokenCountProvider {
        match provider {
            Provider::Anthropic => self.anthropic.as_ref(),
            Provider::Google => self.google.as_ref(),
        }
    }

    /// Validate, resolve, invoke and normalize a single count request
    #[instrument(skip(self, request), fields(model = request.model.as_deref().unwrap_or("")))]
    pub async fn count_tokens(&self, request: CountRequest) -> AppResult<CountResponse> {
        let (messages, entry) = self.validate(&request)?;

        let adapter = self.adapter(entry.provider);
        let count = adapter
            .count_tokens(&entry.model_id, messages)
            .await
            .map_err(|err| external_error(entry.provider, err))?;

        let response = CountResponse {
            input_tokens: count.input_tokens(),
        };
        info!(
            provider = %entry.provider,
            input_tokens = response.input_tokens,
            "Token count completed"
        );
        Ok(response)
    }

    /// Check the request and resolve its model before any network call
    fn validate<'a>(
        &'a self,
        request: &'a CountRequest,
    ) -> AppResult<(&'a [Message], &'a ModelEntry)> {
        let messages = request
            .messages
            .as_deref()
            .ok_or_else(|| AppError::validation("Messages are required"))?;

        if messages.is_empty() {
            return Err(AppError::validation("Messages must not be empty"));
        }

        let model = request.model.as_deref().unwrap_or_default();
        let entry = self.registry.lookup(model).ok_or_else(|| {
            AppError::validation(format!(
                "Unsupported model: {}. Supported models: {}",
                model,
                self.registry.supported_ids()
            ))
        })?;

        Ok((messages, entry))
    }
}

/// Attribute an adapter failure to the provider it came from
fn external_error(provider: Provider, err: ProviderError) -> AppError {
    warn!(provider = %provider, status = ?err.status, error = %err, "Provider token count failed");
    metrics::counter!("tokenscope_provider_errors_total", "provider" => provider.as_str())
        .increment(1);

    AppError::ExternalApi {
        provider,
        message: err
            .message
            .unwrap_or_else(|| provider.generic_error_message().to_string()),
        status: err.status,
    }
}
