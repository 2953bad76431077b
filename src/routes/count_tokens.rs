//! Token count endpoint
//!
//! `POST /count-tokens` validates the request, dispatches it to the provider
//! that owns the model, and returns `{ "inputTokens": n }`.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::instrument;

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    routes::metrics::{record_request, record_tokens},
    tokens::types::{CountRequest, CountResponse},
    AppState,
};

/// Count the input tokens of a conversation
#[utoipa::path(
    post,
    path = "/count-tokens",
    tag = "Tokens",
    request_body = CountRequest,
    responses(
        (status = 200, description = "Token count computed by the provider", body = CountResponse),
        (status = 400, description = "Missing messages or unsupported model, or the provider rejected the request", body = ErrorResponse),
        (status = "4XX", description = "Provider client error; the upstream status is passed through (e.g. 401, 429)", body = ErrorResponse),
        (status = 500, description = "Provider unreachable, undecodable provider response, or internal failure", body = ErrorResponse),
        (status = "5XX", description = "Provider server error; the upstream status is passed through (e.g. 503, 529)", body = ErrorResponse)
    )
)]
#[instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn count_tokens(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CountRequest>, JsonRejection>,
) -> AppResult<Json<CountResponse>> {
    let start = Instant::now();

    let Json(request) = payload.map_err(|rejection| {
        AppError::validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    // Unknown ids are folded into one label to bound metric cardinality
    let registry = state.dispatcher.registry();
    let (model_label, provider) = request
        .model
        .as_deref()
        .and_then(|model| registry.lookup(model))
        .map(|entry| (entry.model_id.clone(), Some(entry.provider)))
        .unwrap_or_else(|| ("unknown".to_string(), None));

    let result = state.dispatcher.count_tokens(request).await;
    let duration = start.elapsed().as_secs_f64();

    match &result {
        Ok(response) => {
            record_request("success", &model_label, duration);
            if let Some(provider) = provider {
                record_tokens(provider.as_str(), &model_label, response.input_tokens);
            }
        }
        Err(err) => record_request(err.kind().as_str(), &model_label, duration),
    }

    result.map(Json)
}
