mod error;
pub mod json;
mod openai;

pub use error::ModelError;
pub use openai::OpenAIClient;

use async_trait::async_trait;

/// Trait for chat model providers.
///
/// This abstraction lets the pipeline swap between real OpenAI-compatible
/// endpoints and scripted models in tests without changing the rest of
/// the code. Each pipeline step holds its own client so the planning,
/// digest, and report roles can run on different models.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete a prompt and return the response.
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;

    /// Complete a prompt with a system message.
    async fn complete_with_system(&self, system: &str, prompt: &str) -> Result<String, ModelError>;

    /// The model identifier, used to name report files.
    fn model_name(&self) -> &str;
}
