//! Prompt templates for every model call in the pipeline.
//!
//! Structured steps (translation, brief, plan) ask for pure JSON and go
//! through the repair loop in the planner; synthesis steps (digest,
//! report) ask for Markdown.

/// Instruction block for the basic report method.
pub const REPORT_BASIC_INSTRUCTIONS: &str = r#"You are a professional researcher. Based on the provided category reports and literature, compile a comprehensive investigative report.

Instructions:
- Always stay focused on the research goal.
- Integrate all the content from the provided literature into a logical structure; reorganize it, do not delete or oversimplify it.
- Keep numbers and statistics together with the source they came from.
- Develop meaningful insights in every section, beyond what the literature states explicitly.
- Never cite a number you cannot support with the provided literature.
- Use tables or Mermaid diagrams to illustrate, but only where they genuinely help."#;

/// Instruction block for the detailed report method.
pub const REPORT_DETAILED_INSTRUCTIONS: &str = r#"You are a professional researcher. Based on the provided category reports and literature, compile a comprehensive and detailed investigative report with extensive analysis and explanations.

Instructions:
- Always stay focused on the research goal.
- Integrate all the content from the provided literature; elaborate each section fully rather than summarizing it.
- Keep numbers and statistics together with the source they came from.
- Order the sections so the report reads as one coherent investigation.
- Close with a conclusion that deepens the insights developed along the way.
- Never cite a number you cannot support with the provided literature.
- Use tables or Mermaid diagrams to illustrate, but only where they genuinely help."#;

/// Instruction block for the social report method.
pub const REPORT_SOCIAL_INSTRUCTIONS: &str = r#"You are a popular science writer. Based on the research topic and the provided materials, write a warm, engaging article for a general audience.

Instructions:
- Open with a title that draws attention without overpromising.
- Write with empathy: every section should explain the underlying principles and background in plain language.
- Keep the tone conversational; an occasional emoji is fine, strained metaphors are not.
- Stay accurate to the provided materials.
- Close the article by naming the sources it relies on."#;

/// Builds the prompt that translates a topic to English.
pub fn build_translate_prompt(topic: &str) -> String {
    format!(
        r#"You are a professional translator. Translate the topic below to English.

Reply with only a JSON object of this exact shape, holding the translated text:
{{"response": ""}}

Topic: [{topic}]"#
    )
}

/// Builds the prompt that distills a topic into a research brief.
pub fn build_brief_prompt(topic: &str) -> String {
    format!(
        r#"You are a research expert preparing the background for a new research project.

Think through the topic below: identify the core question behind it, define what
is in and out of scope, and state what a finished report should achieve.

Reply with only a JSON object of this exact shape:
{{
  "original_topic": "",
  "core_research_topic": "",
  "research_scope": "",
  "research_target": ""
}}

Research topic: [{topic}]"#
    )
}

/// Builds the prompt that produces the categorized query plan.
pub fn build_plan_prompt(brief: &str, queries_per_category: usize, injection: Option<&str>) -> String {
    let mut prompt = format!(
        r#"You are a research planner building a web search strategy.

Based on the research background below, work out a categorized list of search
queries that covers every aspect of the research goal. Make each query specific
to its category and to the research topic, so the results stay narrow.

Research background:
{brief}

Reply with only a JSON object of this exact shape, with exactly {queries_per_category} queries per category:
{{
  "research_plan": [
    {{
      "category": "",
      "category_research_goal": "",
      "queries_list": [""]
    }}
  ]
}}

Before replying, check the plan against the research goal and add a category if
an important aspect is missing."#
    );

    if let Some(extra) = injection {
        prompt.push_str("\n\nAdditional instructions:\n");
        prompt.push_str(extra);
    }

    prompt
}

/// Builds the prompt that digests one category's search results.
pub fn build_digest_prompt(topic: &str, category: &str, goal: &str, resources: &str) -> String {
    format!(
        r#"You are a professional researcher. The current research topic is:

{topic}

Under the sub-category [{category}] (goal: {goal}), read all the collected
resources below and integrate them into one comprehensive category report.

- Base every statement on the collected resources and keep numbers with their source.
- Elaborate each part fully; do not drop or oversimplify information.
- Structure the report with clear sections.

Collected resources:

{resources}

Provide the output in Markdown format."#
    )
}

/// Builds the system message for the final report.
pub fn build_report_system(instructions: &str, language: &str, injection: Option<&str>) -> String {
    let mut system = format!(
        r#"{instructions}

Report format:
- Use [{language}]
- Markdown format
- Key points highlighted with **bold**
- Title using #
- Sections using ## with insights
- Subsections using ### with detailed content"#
    );

    if let Some(extra) = injection {
        system.push_str("\n\nAdditional instructions:\n");
        system.push_str(extra);
    }

    system
}

/// Builds the user prompt for the final report.
pub fn build_report_prompt(topic: &str, literature: &str) -> String {
    format!(
        r#"Research topic:

{topic}

Collected literature and category reports:

{literature}"#
    )
}

/// Builds the re-ask prompt after a malformed JSON reply.
pub fn build_repair_prompt(error: &str, raw: &str) -> String {
    format!(
        r#"Your previous reply could not be parsed as JSON ({error}).

Reply again with only the corrected JSON document, keeping the content and the
structure that was originally requested. No commentary, no code fences.

Previous reply:
{raw}"#
    )
}
