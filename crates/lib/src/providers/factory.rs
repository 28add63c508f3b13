//! # AI Provider Factory
//!
//! Builds the generation provider from configuration. Any consumer (server, cli)
//! goes through here so provider selection stays consistent.

use crate::{
    errors::PipelineError,
    providers::ai::{gemini::GeminiProvider, local::LocalAiProvider, AiProvider},
    types::AiProviderConfig,
};
use tracing::info;

const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Creates an AI provider instance from its configuration block.
///
/// - `local` / `openai`: any OpenAI-compatible chat-completions endpoint. `api_url` is required.
/// - `gemini`: `api_key` is required; `api_url` is derived from `model_name` when absent.
pub fn create_ai_provider(config: &AiProviderConfig) -> Result<Box<dyn AiProvider>, PipelineError> {
    let provider: Box<dyn AiProvider> = match config.provider.as_str() {
        "gemini" => {
            let api_key = config.api_key.clone().filter(|k| !k.is_empty()).ok_or_else(|| {
                PipelineError::MissingAiProvider(
                    "api_key is required for the gemini provider. Please set AI_API_KEY."
                        .to_string(),
                )
            })?;
            let model = config
                .model_name
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(GEMINI_DEFAULT_MODEL);
            let api_url = config.api_url.clone().filter(|u| !u.is_empty()).unwrap_or_else(|| {
                format!(
                    "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent"
                )
            });
            info!("Configuring Gemini provider with URL: {}", api_url);
            Box::new(
                GeminiProvider::new(api_url, api_key)?
                    .with_temperature(config.temperature)
                    .with_max_tokens(config.max_tokens),
            )
        }
        "local" | "openai" => {
            let api_url = config.api_url.clone().filter(|u| !u.is_empty()).ok_or_else(|| {
                PipelineError::MissingAiProvider(format!(
                    "api_url is required for the {} provider. Please set AI_API_URL.",
                    config.provider
                ))
            })?;
            info!("Configuring OpenAI-compatible provider with URL: {}", api_url);
            Box::new(
                LocalAiProvider::new(
                    api_url,
                    config.api_key.clone().filter(|k| !k.is_empty()),
                    config.model_name.clone().filter(|m| !m.is_empty()),
                )?
                .with_temperature(config.temperature)
                .with_max_tokens(config.max_tokens),
            )
        }
        other => return Err(PipelineError::UnsupportedProvider(other.to_string())),
    };

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> AiProviderConfig {
        AiProviderConfig {
            provider: provider.to_string(),
            api_url: None,
            api_key: None,
            model_name: None,
            temperature: 0.4,
            max_tokens: 1024,
        }
    }

    #[test]
    fn local_provider_requires_url() {
        let err = create_ai_provider(&config("local")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingAiProvider(_)));
    }

    #[test]
    fn gemini_provider_requires_key() {
        let err = create_ai_provider(&config("gemini")).unwrap_err();
        assert!(matches!(err, PipelineError::MissingAiProvider(_)));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let err = create_ai_provider(&config("claude-local")).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedProvider(name) if name == "claude-local"));
    }

    #[test]
    fn openai_alias_builds_local_provider() {
        let mut cfg = config("openai");
        cfg.api_url = Some("http://localhost:1234/v1/chat/completions".to_string());
        assert!(create_ai_provider(&cfg).is_ok());
    }
}
