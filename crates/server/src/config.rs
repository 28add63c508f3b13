//! # Application Configuration
//!
//! This module defines the configuration structure for the `seocrew-server` and
//! provides the logic for loading it from a `config.yml` file and environment
//! variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use seocrew::{providers::search::serpapi::SERPAPI_DEFAULT_URL, AiProviderConfig, SearchSettings};
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Overridden by the `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The language model used by every pipeline stage.
    pub ai: AiProviderConfig,
    /// The competitor search service.
    #[serde(default)]
    pub search: SearchConfig,
    /// A directory of extra client profiles layered over the built-in ones.
    #[serde(default)]
    pub profiles_dir: Option<String>,
}

fn default_port() -> u16 {
    8000
}

/// SerpApi endpoint, credentials and locale.
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_search_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_result_count")]
    pub result_count: u32,
}

fn default_search_api_url() -> String {
    SERPAPI_DEFAULT_URL.to_string()
}

fn default_language() -> String {
    SearchSettings::default().language
}

fn default_region() -> String {
    SearchSettings::default().region
}

fn default_result_count() -> u32 {
    SearchSettings::default().result_count
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_url: default_search_api_url(),
            api_key: None,
            language: default_language(),
            region: default_region(),
            result_count: default_result_count(),
        }
    }
}

impl SearchConfig {
    pub fn settings(&self) -> SearchSettings {
        SearchSettings {
            language: self.language.clone(),
            region: self.region.clone(),
            result_count: self.result_count,
        }
    }
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - `${VAR}` references in the file are replaced from the process environment.
/// - Top-level keys like `port` are overridden by `PORT`.
/// - Nested keys are overridden by `SEOCREW_...` variables (e.g., `SEOCREW_SEARCH__RESULT_COUNT`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        // Layer 1: Programmatic defaults.
        .set_default("port", i64::from(default_port()))?
        .set_default("search.api_url", SERPAPI_DEFAULT_URL)?;

    // Layer 2: Main Config (with Fallback)
    let main_config_path = if let Some(override_path) = config_path_override {
        override_path.to_string()
    } else {
        let user_config_path = format!("{base_path}/config.yml");
        if std::path::Path::new(&user_config_path).exists() {
            info!("Loading user-defined configuration from '{user_config_path}'.");
            user_config_path
        } else {
            let provider = env::var("AI_PROVIDER").unwrap_or_else(|_| "local".to_string());
            let fallback_path = format!("{base_path}/config.{provider}.yml");
            info!("'{user_config_path}' not found. Falling back to '{fallback_path}' based on AI_PROVIDER='{provider}'.");
            fallback_path
        }
    };

    let main_content = read_and_substitute(&main_config_path)?
        .ok_or_else(|| ConfigError::NotFound(format!("Main config file not found at '{main_config_path}'. Please ensure 'config.yml' exists or your AI_PROVIDER is set to load a valid template ('local' or 'gemini').")))?;
    builder = builder.add_source(File::from_str(&main_content, FileFormat::Yaml));

    let settings = builder
        // Layer 3: Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 4: Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("SEOCREW")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // Substitution leaves empty strings behind for unset variables.
    if config.profiles_dir.as_deref().is_some_and(str::is_empty) {
        config.profiles_dir = None;
    }
    // Fall back to the conventional SerpApi variable when the file doesn't set a key.
    if config.search.api_key.as_deref().map_or(true, str::is_empty) {
        config.search.api_key = env::var("SERPAPI_API_KEY").ok().filter(|k| !k.is_empty());
    }

    Ok(config)
}
