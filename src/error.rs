//! Error types for Tokenscope
//!
//! Every failure a request can hit is an [`AppError`]. The `IntoResponse`
//! impl is the one place where an error kind is mapped to an HTTP status
//! and a JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::registry::Provider;

/// Message returned for any failure that is not one of the typed errors
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Caller-correctable request problem
    #[error("{0}")]
    Validation(String),

    /// A provider token-count call failed
    #[error("{}: {message}", .provider.generic_error_message())]
    ExternalApi {
        provider: Provider,
        message: String,
        status: Option<u16>,
    },

    #[error("Internal error: {0}")]
    Internal(anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// The error kind reported in the `type` field
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::ValidationError,
            AppError::ExternalApi {
                provider: Provider::Anthropic,
                ..
            } => ErrorKind::AnthropicApiError,
            AppError::ExternalApi {
                provider: Provider::Google,
                ..
            } => ErrorKind::GoogleApiError,
            AppError::Internal(_) => ErrorKind::ServerError,
        }
    }

    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::ExternalApi { status, .. } => status
                .and_then(|code| StatusCode::from_u16(code).ok())
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the response body. Internal detail never reaches the caller.
    pub fn to_body(&self) -> ErrorResponse {
        match self {
            AppError::Validation(message) => ErrorResponse {
                error: message.clone(),
                error_type: self.kind(),
                status: None,
            },
            AppError::ExternalApi { message, .. } => ErrorResponse {
                error: message.clone(),
                error_type: self.kind(),
                status: Some(self.status_code().as_u16()),
            },
            AppError::Internal(_) => ErrorResponse::internal(),
        }
    }
}

/// Closed set of error kinds exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    AnthropicApiError,
    GoogleApiError,
    ServerError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::AnthropicApiError => "anthropic_api_error",
            ErrorKind::GoogleApiError => "google_api_error",
            ErrorKind::ServerError => "server_error",
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,
    #[serde(rename = "type")]
    pub error_type: ErrorKind,
    /// Upstream status, present for provider errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn internal() -> Self {
        Self {
            error: INTERNAL_ERROR_MESSAGE.to_string(),
            error_type: ErrorKind::ServerError,
            status: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(ref err) = self {
            error!(error = %err, "Unhandled internal error");
        }

        (self.status_code(), Json(self.to_body())).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
