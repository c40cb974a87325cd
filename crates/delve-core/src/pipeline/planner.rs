use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::PlanConfig;
use crate::llm::json::parse_json_response;
use crate::llm::{ChatModel, ModelError};
use crate::plan::{Brief, Category, Plan};

use super::prompts::{build_brief_prompt, build_plan_prompt, build_repair_prompt, build_translate_prompt};

/// Runs the planning stage: topic → English translation → brief → query plan.
///
/// All three steps expect structured JSON from the model. When a reply
/// does not parse, the planner re-asks with the parse error up to the
/// configured repair budget before giving up.
pub struct Planner<M: ChatModel> {
    model: M,
    config: PlanConfig,
}

/// Everything the planning stage produced for a topic.
#[derive(Debug, Clone)]
pub struct PlannerOutput {
    pub english_topic: String,
    pub brief: Brief,
    pub plan: Plan,
}

impl<M: ChatModel> Planner<M> {
    /// Creates a new planner.
    pub fn new(model: M, config: PlanConfig) -> Self {
        Self { model, config }
    }

    /// Runs the full planning stage for the given topic.
    pub async fn run(&self, topic: &str) -> Result<PlannerOutput, PlanGenerationError> {
        // 1. Translate the topic to English so the search queries are too
        let english_topic = self.translate(topic).await?;
        tracing::debug!(topic = %english_topic, "topic translated");

        // 2. Distill the topic into a research brief
        let brief = self.brief(&english_topic).await?;

        // 3. Expand the brief into a categorized query plan
        let plan = self.plan(&brief).await?;
        tracing::info!(
            categories = plan.categories.len(),
            queries = plan.query_count(),
            "research plan generated"
        );

        Ok(PlannerOutput {
            english_topic,
            brief,
            plan,
        })
    }

    /// Translates the topic to English.
    ///
    /// Falls back to the original topic when the model returns an empty
    /// translation, which happens with already-English topics.
    async fn translate(&self, topic: &str) -> Result<String, PlanGenerationError> {
        let prompt = build_translate_prompt(topic);
        let parsed: TranslateResponse = self.structured(&prompt).await?;

        let translated = parsed.response.trim().to_string();
        if translated.is_empty() {
            tracing::warn!("model returned empty translation, keeping original topic");
            return Ok(topic.to_string());
        }

        Ok(translated)
    }

    /// Distills the English topic into a research brief.
    async fn brief(&self, english_topic: &str) -> Result<Brief, PlanGenerationError> {
        let prompt = build_brief_prompt(english_topic);
        self.structured(&prompt).await
    }

    /// Expands the brief into a categorized query plan.
    async fn plan(&self, brief: &Brief) -> Result<Plan, PlanGenerationError> {
        let prompt = build_plan_prompt(
            &brief.to_prompt_block(),
            self.config.queries_per_category,
            self.config.injection.as_deref(),
        );
        let parsed: PlanResponse = self.structured(&prompt).await?;

        let categories: Vec<Category> = parsed
            .research_plan
            .into_iter()
            .filter_map(|c| self.normalize_category(c))
            .collect();

        let plan = Plan::new(categories);
        if plan.is_empty() {
            return Err(PlanGenerationError::EmptyPlan);
        }

        Ok(plan)
    }

    /// Cleans up one category from the model reply.
    ///
    /// Blank queries are dropped, surplus queries beyond the configured
    /// count are cut, and a category left with no queries is discarded.
    fn normalize_category(&self, category: CategoryResponse) -> Option<Category> {
        let mut queries: Vec<String> = category
            .queries_list
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        queries.truncate(self.config.queries_per_category);

        let name = category.category.trim().to_string();
        if name.is_empty() || queries.is_empty() {
            return None;
        }

        Some(Category {
            name,
            goal: category.category_research_goal,
            queries,
        })
    }

    /// Sends a prompt expecting JSON, repairing malformed replies.
    async fn structured<T: DeserializeOwned>(&self, prompt: &str) -> Result<T, PlanGenerationError> {
        let mut response = self.model.complete(prompt).await?;
        let mut attempt = 0;

        loop {
            match parse_json_response::<T>(&response) {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.config.max_repairs => {
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        error = %err,
                        "model returned malformed JSON, asking for a repair"
                    );
                    let repair = build_repair_prompt(&err.to_string(), &response);
                    response = self.model.complete(&repair).await?;
                }
                Err(err) => {
                    return Err(PlanGenerationError::MalformedResponse {
                        message: err.to_string(),
                        excerpt: excerpt(&response),
                    });
                }
            }
        }
    }
}

/// First characters of a reply, for error messages.
fn excerpt(response: &str) -> String {
    response.chars().take(200).collect()
}

/// Response structure for the translation step.
#[derive(Debug, serde::Deserialize)]
struct TranslateResponse {
    response: String,
}

/// Response structure for the plan step.
#[derive(Debug, serde::Deserialize)]
struct PlanResponse {
    research_plan: Vec<CategoryResponse>,
}

#[derive(Debug, serde::Deserialize)]
struct CategoryResponse {
    category: String,
    #[serde(default)]
    category_research_goal: String,
    #[serde(default)]
    queries_list: Vec<String>,
}

/// Errors that can occur during plan generation.
#[derive(Debug, Error)]
pub enum PlanGenerationError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Model reply was not valid JSON after repairs: {message}. Reply began: {excerpt}")]
    MalformedResponse { message: String, excerpt: String },

    #[error("Model produced an empty research plan")]
    EmptyPlan,
}
