use super::{SearchProvider, SearchQuery, SearchResult};
use crate::errors::PipelineError;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::debug;

pub const SERPAPI_DEFAULT_URL: &str = "https://serpapi.com/search.json";

#[derive(Deserialize, Debug)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SearchResult>,
    #[serde(default)]
    error: Option<String>,
}

/// A `SearchProvider` backed by SerpApi's Google engine.
#[derive(Clone, Debug)]
pub struct SerpApiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl SerpApiProvider {
    pub fn new(api_url: String, api_key: Option<String>) -> Result<Self, PipelineError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(PipelineError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }
}

#[async_trait]
impl SearchProvider for SerpApiProvider {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, PipelineError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(PipelineError::MissingSearchApiKey)?;

        let num = query.result_count.to_string();
        let params = [
            ("engine", "google"),
            ("q", query.query.as_str()),
            ("hl", query.language.as_str()),
            ("gl", query.region.as_str()),
            ("num", num.as_str()),
            ("api_key", api_key),
        ];

        debug!(query = %query.query, num = %num, "Querying SerpApi");

        let response = self
            .client
            .get(&self.api_url)
            .query(&params)
            .send()
            .await
            .map_err(PipelineError::SearchRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PipelineError::SearchApi(error_text));
        }

        let body: SerpApiResponse = response
            .json()
            .await
            .map_err(PipelineError::SearchDeserialization)?;

        if let Some(error) = body.error {
            if body.organic_results.is_empty() {
                return Err(PipelineError::SearchApi(error));
            }
        }

        Ok(body.organic_results)
    }
}
