pub mod serpapi;

use crate::errors::PipelineError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// One organic search result.
///
/// Every field is optional: upstream entries may carry the destination under
/// `link` or under `url`, and some carry neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SearchResult {
    /// The destination URL: `link` when present and non-empty, else `url`, else "".
    pub fn destination(&self) -> &str {
        match self.link.as_deref() {
            Some(link) if !link.is_empty() => link,
            _ => self.url.as_deref().unwrap_or(""),
        }
    }
}

/// A keyword search restricted to a locale and a result count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub language: String,
    pub region: String,
    pub result_count: u32,
}

/// A trait for the search-results collaborator used for competitor research.
#[async_trait]
pub trait SearchProvider: Send + Sync + Debug + DynClone {
    /// Runs the query and returns organic results in ranking order.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, PipelineError>;
}

dyn_clone::clone_trait_object!(SearchProvider);
