use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{SearchConfig, DEFAULT_TAVILY_URL};

use super::template::SearchParams;
use super::{SearchApi, SearchError, SearchResult};

/// Client for the Tavily search API.
pub struct TavilyClient {
    api_key: String,
    base_url: String,
    client: Client,
}

impl TavilyClient {
    /// Creates a new Tavily client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_TAVILY_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Creates a client from the search configuration section.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Self::from_config_with(config, |name| std::env::var(name).ok())
    }

    /// Builds the client with an explicit environment lookup for the API key.
    fn from_config_with(
        config: &SearchConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SearchError> {
        let api_key = config.resolve_api_key(env).ok_or(SearchError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SearchApi for TavilyClient {
    async fn search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let request = TavilySearchRequest {
            query: query.to_string(),
            search_depth: params.search_depth.clone(),
            max_results: params.max_results,
            include_answer: false,
            include_raw_content: params.include_raw_content,
            topic: params.topic.clone(),
            include_domains: params.include_domains.clone(),
            exclude_domains: params.exclude_domains.clone(),
        };

        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let search_response: TavilySearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        Ok(search_response.results)
    }
}

#[derive(Debug, Serialize)]
struct TavilySearchRequest {
    query: String,
    search_depth: String,
    max_results: u32,
    include_answer: bool,
    include_raw_content: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    topic: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    include_domains: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    exclude_domains: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}
