use anyhow::Result;
use seocrew::errors::PipelineError;
use seocrew::profiles::{ClientProfile, ProfileRegistry};
use seocrew::providers::ai::AiProvider;
use seocrew::providers::search::{SearchProvider, SearchQuery, SearchResult};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
enum Programmed {
    Respond(String),
    Fail(String),
}

/// An `AiProvider` that answers from pre-programmed responses and records every call.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<Vec<(String, Programmed)>>>,
    default_response: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_response: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the system prompt (the stage role works well).
    /// Keys are checked in the order they were added.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.push((key.to_string(), Programmed::Respond(response.to_string())));
    }

    /// Makes calls whose system prompt contains `key` fail with an API error.
    pub fn add_failure(&self, key: &str, message: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.push((key.to_string(), Programmed::Fail(message.to_string())));
    }

    /// The response returned when no key matches.
    pub fn set_default_response(&self, response: &str) {
        *self.default_response.lock().unwrap() = Some(response.to_string());
    }

    /// Retrieves the recorded `(system_prompt, user_prompt)` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PipelineError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((system_prompt.to_string(), user_prompt.to_string()));

        let responses = self.responses.lock().unwrap();
        for (key, programmed) in responses.iter() {
            if system_prompt.contains(key.as_str()) {
                return match programmed {
                    Programmed::Respond(response) => Ok(response.clone()),
                    Programmed::Fail(message) => Err(PipelineError::AiApi(message.clone())),
                };
            }
        }

        if let Some(default) = self.default_response.lock().unwrap().clone() {
            return Ok(default);
        }

        Err(PipelineError::AiApi(format!(
            "MockAiProvider: No response programmed for system prompt. Got: '{system_prompt}'"
        )))
    }
}

// --- Mock Search Provider ---

/// A `SearchProvider` returning fixed results, or failing, and recording every query.
#[derive(Clone, Debug)]
pub struct MockSearchProvider {
    results: Arc<Mutex<Result<Vec<SearchResult>, String>>>,
    queries: Arc<Mutex<Vec<SearchQuery>>>,
}

impl MockSearchProvider {
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self {
            results: Arc::new(Mutex::new(Ok(results))),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn empty() -> Self {
        Self::with_results(Vec::new())
    }

    /// Every search fails with a search API error carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            results: Arc::new(Mutex::new(Err(message.to_string()))),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, PipelineError> {
        self.queries.lock().unwrap().push(query.clone());
        self.results
            .lock()
            .unwrap()
            .clone()
            .map_err(PipelineError::SearchApi)
    }
}

// --- Fixtures ---

/// Builds a search result with every field set.
pub fn search_result(title: &str, snippet: &str, link: &str) -> SearchResult {
    SearchResult {
        title: Some(title.to_string()),
        snippet: Some(snippet.to_string()),
        link: Some(link.to_string()),
        url: None,
    }
}

/// Loads one of the built-in client profiles.
pub fn builtin_profile(slug: &str) -> Result<Arc<ClientProfile>> {
    ProfileRegistry::builtin()?
        .get(slug)
        .ok_or_else(|| anyhow::anyhow!("no built-in profile '{slug}'"))
}
