use thiserror::Error;

/// Errors that can occur during web search operations.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Missing API key. Set TAVILY_API_KEY or configure search.api_key.")]
    MissingApiKey,

    #[error("Search API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse search response: {0}")]
    ParseError(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Network(err.to_string())
    }
}
