//! Model registry
//!
//! Static mapping from a model identifier to the provider that serves it
//! and a human-readable display name. Built once at startup and shared
//! read-only for the lifetime of the process.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Token-counting vendor that owns a model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Anthropic => "anthropic",
            Provider::Google => "google",
        }
    }

    /// Message used when a failed provider call carries no text of its own
    pub fn generic_error_message(&self) -> &'static str {
        match self {
            Provider::Anthropic => "Anthropic API error",
            Provider::Google => "Google API error",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single supported model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    /// Unique model identifier, sent verbatim to the provider
    pub model_id: String,
    pub provider: Provider,
    /// Name shown in the model selector
    #[serde(alias = "name")]
    pub display_name: String,
}

impl ModelEntry {
    pub fn new(
        model_id: impl Into<String>,
        provider: Provider,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            provider,
            display_name: display_name.into(),
        }
    }
}

/// Errors raised while building a registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Model registry must contain at least one model")]
    Empty,

    #[error("Duplicate model id in registry: {0}")]
    DuplicateModel(String),

    #[error("Failed to read model registry file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model registry file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Ordered, immutable list of supported models
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
}

impl ModelRegistry {
    /// Build a registry, rejecting empty lists and duplicate ids
    pub fn new(entries: Vec<ModelEntry>) -> Result<Self, RegistryError> {
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.model_id.as_str()) {
                return Err(RegistryError::DuplicateModel(entry.model_id.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// Load a registry from a JSON array of model entries
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<ModelEntry> = serde_json::from_str(&raw)?;
        Self::new(entries)
    }

    /// Find the entry for a model id
    pub fn lookup(&self, model_id: &str) -> Option<&ModelEntry> {
        self.entries.iter().find(|entry| entry.model_id == model_id)
    }

    /// All supported models in registry order
    pub fn list_supported(&self) -> &[ModelEntry] {
        &self.entries
    }

    /// Supported model ids, comma separated, in registry order
    pub fn supported_ids(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.model_id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self {
            entries: vec![
                ModelEntry::new(
                    "claude-4-sonnet-20250514",
                    Provider::Anthropic,
                    "Claude 4 Sonnet",
                ),
                ModelEntry::new(
                    "claude-4-opus-20250514",
                    Provider::Anthropic,
                    "Claude 4 Opus",
                ),
                ModelEntry::new("gemini-2.5-pro", Provider::Google, "Gemini 2.5 Pro"),
                ModelEntry::new("gemini-2.5-flash", Provider::Google, "Gemini 2.5 Flash"),
            ],
        }
    }
}
