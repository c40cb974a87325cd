mod error;
mod tavily;
mod template;

pub use error::SearchError;
pub use tavily::TavilyClient;
pub use template::SearchParams;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single ranked result from the search API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Page title
    #[serde(default)]
    pub title: String,
    /// Page URL
    pub url: String,
    /// Snippet extracted by the search API
    #[serde(default)]
    pub content: String,
    /// Full page text, present when requested and retrievable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    /// Relevance score assigned by the search API, 0.0 to 1.0
    #[serde(default)]
    pub score: f64,
}

impl SearchResult {
    /// Returns the richest text available for this result.
    ///
    /// Prefers the full page text over the snippet when present.
    pub fn best_content(&self) -> &str {
        match &self.raw_content {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => &self.content,
        }
    }

    /// Returns true if this result should feed into synthesis.
    ///
    /// A result qualifies when it has a title, some text, and scores
    /// above the relevance threshold.
    pub fn is_relevant(&self, min_score: f64) -> bool {
        !self.title.is_empty() && !self.best_content().is_empty() && self.score > min_score
    }
}

/// The stored outcome of one executed query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResults {
    /// The query as it was sent to the search API
    pub query: String,
    /// Results in API ranking order
    pub results: Vec<SearchResult>,
}

/// Trait for web search providers.
///
/// Lets the executor fan out queries without knowing which search API
/// backs them, and lets tests substitute a scripted provider.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Runs one query and returns the ranked results.
    async fn search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> Result<Vec<SearchResult>, SearchError>;
}
