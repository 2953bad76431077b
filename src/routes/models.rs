//! Models endpoint
//!
//! Lists the supported models in registry order for the model selector.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{registry::ModelEntry, AppState};

/// Models list response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ModelsResponse {
    pub models: Vec<ModelEntry>,
}

/// List supported models
#[utoipa::path(
    get,
    path = "/models",
    tag = "Models",
    responses(
        (status = 200, description = "Supported models in registry order", body = ModelsResponse)
    )
)]
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.dispatcher.registry().list_supported().to_vec(),
    })
}
