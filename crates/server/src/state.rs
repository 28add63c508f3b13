//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. Everything in it is read-only once built, so
//! concurrent requests share it freely.

use crate::config::AppConfig;
use seocrew::{
    providers::{factory::create_ai_provider, search::serpapi::SerpApiProvider},
    PipelineExecutor, PipelineFactory, ProfileRegistry,
};
use std::sync::Arc;
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Every client profile, keyed by slug and route.
    pub registry: Arc<ProfileRegistry>,
    /// Builds per-request pipelines (one competitor search each).
    pub factory: Arc<PipelineFactory>,
    /// Runs pipelines against the configured language model.
    pub executor: Arc<PipelineExecutor>,
}

/// Builds the shared application state from the configuration.
///
/// - Loads the built-in client profiles, overlaid by `profiles_dir` when set.
/// - Instantiates the configured AI provider.
/// - Sets up the SerpApi search provider.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let mut registry = ProfileRegistry::builtin()?;
    if let Some(dir) = &config.profiles_dir {
        registry = registry.with_directory(dir)?;
    }
    info!(clients = registry.len(), "Client profiles loaded");

    let ai_provider = create_ai_provider(&config.ai)?;

    if config.search.api_key.is_none() {
        warn!("No SerpApi key configured; pipelines will run without competitor research.");
    }
    let search = SerpApiProvider::new(config.search.api_url.clone(), config.search.api_key.clone())?;
    let factory = PipelineFactory::new(Arc::new(search), config.search.settings());

    Ok(AppState {
        registry: Arc::new(registry),
        factory: Arc::new(factory),
        executor: Arc::new(PipelineExecutor::new(Arc::from(ai_provider))),
    })
}
