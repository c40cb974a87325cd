use thiserror::Error;

/// Errors that can occur when talking to a chat model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Missing API key. Set OPENAI_KEY or configure llm.api_key.")]
    MissingApiKey,

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited. Try again later.")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        ModelError::Network(err.to_string())
    }
}
