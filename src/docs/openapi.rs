//! OpenAPI specification for the public API
//!
//! Aggregates the token count and models endpoints and their schemas into a
//! single OpenAPI document.

use utoipa::OpenApi;

use crate::{
    error::{ErrorKind, ErrorResponse},
    registry::{ModelEntry, Provider},
    routes::models::ModelsResponse,
    tokens::types::{CountRequest, CountResponse, Message, Role},
};

/// OpenAPI specification for Tokenscope
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tokenscope API",
        version = "1.0.0",
        description = "Counts input tokens for a chat conversation using the model provider's own token counting API"
    ),
    paths(
        crate::routes::count_tokens::count_tokens,
        crate::routes::models::list_models
    ),
    components(
        schemas(
            // Request
            Role,
            Message,
            CountRequest,
            // Response
            CountResponse,
            Provider,
            ModelEntry,
            ModelsResponse,
            // Error
            ErrorKind,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Tokens", description = "Token counting"),
        (name = "Models", description = "Supported models")
    )
)]
pub struct ApiDoc;
