//! # Competitor-Search Adapter
//!
//! Runs the one keyword search a pipeline build performs and renders the
//! results as a plain-text digest used for inspiration only.

use crate::{
    providers::search::{SearchProvider, SearchQuery, SearchResult},
    types::SearchSettings,
};
use serde::Serialize;
use tracing::{info, warn};

/// Search results and their digest, computed once per pipeline build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompetitorResearch {
    pub results: Vec<SearchResult>,
    pub digest: String,
}

impl CompetitorResearch {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_results(results: Vec<SearchResult>) -> Self {
        let digest = format_competitor_digest(&results);
        Self { results, digest }
    }
}

/// Formats search results as `Título / Trecho / URL` blocks separated by blank lines.
pub fn format_competitor_digest(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| {
            format!(
                "Título: {}\nTrecho: {}\nURL: {}\n",
                r.title.as_deref().unwrap_or(""),
                r.snippet.as_deref().unwrap_or(""),
                r.destination()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Searches for `keyword` and builds the digest.
///
/// Failures never abort generation: any error, or an empty result list,
/// degrades to an empty digest.
pub async fn research_competitors(
    provider: &dyn SearchProvider,
    keyword: &str,
    settings: &SearchSettings,
) -> CompetitorResearch {
    let query = SearchQuery {
        query: keyword.to_string(),
        language: settings.language.clone(),
        region: settings.region.clone(),
        result_count: settings.result_count,
    };

    match provider.search(&query).await {
        Ok(results) if results.is_empty() => {
            warn!(keyword, "Competitor search returned no results; continuing without digest");
            CompetitorResearch::empty()
        }
        Ok(results) => {
            info!(keyword, count = results.len(), "Competitor search completed");
            CompetitorResearch::from_results(results)
        }
        Err(e) => {
            warn!(keyword, error = %e, "Competitor search failed; continuing without digest");
            CompetitorResearch::empty()
        }
    }
}
