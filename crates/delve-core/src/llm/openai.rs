use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{
    LLMConfig, DEFAULT_MAX_RETRIES, DEFAULT_MAX_TOKENS, DEFAULT_RETRY_BASE_MS,
    DEFAULT_RETRY_MAX_MS,
};

use super::{ChatModel, ModelError};

/// OpenAI-compatible API client.
///
/// Works with any provider that implements the OpenAI chat completions API:
/// - OpenAI
/// - Azure OpenAI
/// - OpenRouter
/// - Ollama (http://localhost:11434/v1)
/// - vLLM
/// - Groq
/// - And many more
///
/// Rate-limited and failed requests are retried with capped exponential
/// backoff before the error is surfaced to the caller.
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    max_retries: u32,
    client: Client,
}

impl OpenAIClient {
    /// Creates a new OpenAI-compatible client.
    ///
    /// # Arguments
    /// * `base_url` - The API base URL (e.g., "https://api.openai.com/v1")
    /// * `api_key` - The API key (can be empty for local providers like Ollama)
    /// * `model` - The model name (e.g., "gpt-4o", "deepseek/deepseek-r1")
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_retries: DEFAULT_MAX_RETRIES,
            client: Client::new(),
        }
    }

    /// Creates a client for OpenAI.
    pub fn openai(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new("https://api.openai.com/v1", api_key, model)
    }

    /// Creates a client from the LLM configuration section, for the given model.
    ///
    /// The same configuration backs several clients in a pipeline, one per
    /// model role, so the model name is picked by the caller.
    pub fn from_config(config: &LLMConfig, model: impl Into<String>) -> Result<Self, ModelError> {
        Self::from_config_with(config, model, |name| std::env::var(name).ok())
    }

    /// Builds the client with an explicit environment lookup for the API key.
    fn from_config_with(
        config: &LLMConfig,
        model: impl Into<String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ModelError> {
        let api_key = config.resolve_api_key(env).ok_or(ModelError::MissingApiKey)?;

        Ok(Self::new(config.base_url_or_default(), api_key, model)
            .with_max_tokens(config.max_tokens)
            .with_max_retries(config.max_retries))
    }

    /// Sets the maximum tokens for responses.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the retry budget for rate-limited or failed requests.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    async fn send_request(
        &self,
        messages: Vec<ChatMessage>,
        system: Option<&str>,
    ) -> Result<String, ModelError> {
        let mut all_messages = Vec::new();

        // Add system message if provided
        if let Some(sys) = system {
            all_messages.push(ChatMessage {
                role: "system".to_string(),
                content: sys.to_string(),
            });
        }

        all_messages.extend(messages);

        let request = ChatRequest {
            model: self.model.clone(),
            messages: all_messages,
            max_tokens: Some(self.max_tokens),
        };

        let mut attempt = 0;
        loop {
            match self.try_send(&request).await {
                Ok(content) => return Ok(content),
                Err(err @ (ModelError::RateLimited | ModelError::Network(_)))
                    if attempt < self.max_retries =>
                {
                    let delay = retry_delay(attempt);
                    tracing::warn!(
                        model = %self.model,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "model request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_send(&self, request: &ChatRequest) -> Result<String, ModelError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut req = self
            .client
            .post(&url)
            .header("content-type", "application/json");

        // Only add authorization if api_key is not empty
        if !self.api_key.is_empty() {
            req = req.header("authorization", format!("Bearer {}", self.api_key));
        }

        let response = req.json(request).send().await?;

        let status = response.status();

        if status == 429 {
            return Err(ModelError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ModelError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::ParseError(e.to_string()))?;

        // Extract content from first choice
        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}

/// Backoff before the given retry attempt. Doubles per attempt up to a ceiling.
fn retry_delay(attempt: u32) -> Duration {
    let millis = DEFAULT_RETRY_BASE_MS
        .saturating_mul(2u64.saturating_pow(attempt))
        .min(DEFAULT_RETRY_MAX_MS);
    Duration::from_millis(millis)
}

#[async_trait]
impl ChatModel for OpenAIClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];

        self.send_request(messages, None).await
    }

    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, ModelError> {
        let messages = vec![ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }];

        self.send_request(messages, Some(system)).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}
