//! Shared request and configuration types.

use serde::{Deserialize, Serialize};

/// The per-call input to a client pipeline.
///
/// Field names follow the query parameters accepted by the HTTP layer
/// (`?tema=...&palavra_chave=...`). Empty strings are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The article topic.
    pub tema: String,
    /// The target SEO keyword.
    pub palavra_chave: String,
}

impl GenerationRequest {
    pub fn new(tema: impl Into<String>, palavra_chave: impl Into<String>) -> Self {
        Self {
            tema: tema.into(),
            palavra_chave: palavra_chave.into(),
        }
    }
}

/// Configuration for the language-model provider used by every stage.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiProviderConfig {
    /// The type of provider ("local", "openai" or "gemini").
    pub provider: String,
    /// The API URL. Optional for Gemini, where it is derived from the model name.
    #[serde(default)]
    pub api_url: Option<String>,
    /// The API key, which can be null for local providers.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i32,
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_tokens() -> i32 {
    8192
}

/// Locale and sizing for the competitor search.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchSettings {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_result_count")]
    pub result_count: u32,
}

fn default_language() -> String {
    "pt-br".to_string()
}

fn default_region() -> String {
    "br".to_string()
}

fn default_result_count() -> u32 {
    10
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            language: default_language(),
            region: default_region(),
            result_count: default_result_count(),
        }
    }
}
