use serde::{Deserialize, Serialize};

/// The research background distilled from the topic before planning.
///
/// Produced by the planner's briefing step and injected into every
/// later synthesis prompt so the models stay anchored to the same goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brief {
    /// The topic as the user phrased it
    pub original_topic: String,
    /// The core question the research should answer
    pub core_research_topic: String,
    /// What is in and out of scope
    pub research_scope: String,
    /// What a finished report should achieve
    pub research_target: String,
}

impl Brief {
    /// Formats the brief as a block of text for prompts.
    pub fn to_prompt_block(&self) -> String {
        format!(
            "Original topic: {}\nCore research topic: {}\nResearch scope: {}\nResearch target: {}",
            self.original_topic, self.core_research_topic, self.research_scope, self.research_target
        )
    }
}

/// The output of the planning stage.
///
/// An ordered set of categories, each carrying the search queries that
/// the executor will fan out against the search API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Categories in the order the model proposed them
    pub categories: Vec<Category>,
}

impl Plan {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Returns the total number of queries across all categories.
    pub fn query_count(&self) -> usize {
        self.categories.iter().map(|c| c.queries.len()).sum()
    }

    /// Returns true if the plan has no categories or no queries at all.
    pub fn is_empty(&self) -> bool {
        self.query_count() == 0
    }
}

/// One research category within a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Short category name, also used for the on-disk directory
    pub name: String,
    /// What this category should establish for the overall research
    pub goal: String,
    /// Search queries to execute for this category
    pub queries: Vec<String>,
}
