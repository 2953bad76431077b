//! Request and response types for the token counting endpoint

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in conversation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Token count request body
///
/// Both fields are optional at the wire level so that missing values surface
/// as validation errors rather than body rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CountRequest {
    /// Messages in conversation order
    pub messages: Option<Vec<Message>>,
    /// Model identifier from the model registry
    pub model: Option<String>,
}

/// Normalized token count, independent of provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub input_tokens: u64,
}
