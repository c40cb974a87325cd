use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ReportConfig;
use crate::llm::{ChatModel, ModelError};
use crate::plan::Plan;
use crate::search::SearchResult;
use crate::store::{Store, StoreError};

use super::prompts::{
    build_digest_prompt, build_report_prompt, build_report_system, REPORT_BASIC_INSTRUCTIONS,
    REPORT_DETAILED_INSTRUCTIONS, REPORT_SOCIAL_INSTRUCTIONS,
};

/// Longest slice of one source's text fed into a digest prompt.
const MAX_RESOURCE_CHARS: usize = 16_000;

/// The synthesis template used for the final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMethod {
    /// Straight investigative report
    Basic,
    /// Investigative report with extended analysis and a conclusion
    #[default]
    Detailed,
    /// Accessible article for a general audience
    Social,
}

impl ReportMethod {
    /// Short name used in report file names.
    pub fn slug(&self) -> &'static str {
        match self {
            ReportMethod::Basic => "basic",
            ReportMethod::Detailed => "detailed",
            ReportMethod::Social => "social",
        }
    }

    /// Returns a human-readable name for the method.
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportMethod::Basic => "Basic",
            ReportMethod::Detailed => "Detailed",
            ReportMethod::Social => "Social",
        }
    }

    fn instructions(&self) -> &'static str {
        match self {
            ReportMethod::Basic => REPORT_BASIC_INSTRUCTIONS,
            ReportMethod::Detailed => REPORT_DETAILED_INSTRUCTIONS,
            ReportMethod::Social => REPORT_SOCIAL_INSTRUCTIONS,
        }
    }
}

impl FromStr for ReportMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(ReportMethod::Basic),
            "detailed" | "detail" => Ok(ReportMethod::Detailed),
            "social" | "article" => Ok(ReportMethod::Social),
            other => Err(format!(
                "unknown report method '{other}' (expected basic, detailed, or social)"
            )),
        }
    }
}

/// A cached synthesis of one category's search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDigest {
    /// Category name, as it appears in the plan
    pub category: String,
    /// Markdown digest of the category's relevant results
    pub digest: String,
}

/// Files produced by one reporting run.
#[derive(Debug, Clone)]
pub struct ReportArtifacts {
    /// Path of the final report
    pub report_path: PathBuf,
    /// Path of the reference list
    pub reference_path: PathBuf,
    /// Number of distinct sources in the reference list
    pub citation_count: usize,
}

/// Runs the reporting stage: per-category digests, then the final merge.
///
/// Digests are written to the store as they are produced and reused on
/// later runs, so generating a second report for the same session only
/// costs the final merge call. A failed digest is logged and skipped;
/// the merge runs over whatever digests exist.
pub struct Reporter<M: ChatModel> {
    digest_model: M,
    report_model: M,
    config: ReportConfig,
    min_score: f64,
}

impl<M: ChatModel> Reporter<M> {
    /// Creates a new reporter.
    ///
    /// `digest_model` condenses each category's raw results; it should
    /// be a long-context model. `report_model` writes the final report.
    pub fn new(digest_model: M, report_model: M, config: ReportConfig, min_score: f64) -> Self {
        Self {
            digest_model,
            report_model,
            config,
            min_score,
        }
    }

    /// The model that writes the final report.
    pub fn report_model_name(&self) -> &str {
        self.report_model.model_name()
    }

    /// Generates the report and reference list for a searched session.
    pub async fn run<S: Store>(
        &self,
        store: &S,
        session_id: &str,
        topic: &str,
        plan: &Plan,
        method: ReportMethod,
    ) -> Result<ReportArtifacts, ReportGenerationError> {
        // 1. Digest each category, reusing cached digests where possible
        let digests = self.gather_digests(store, session_id, topic, plan).await?;

        // 2. Collect the deduplicated reference list from the raw results
        let (references, citation_count) = self.collect_references(store, session_id, plan)?;

        // 3. Merge the digests into the final report
        let report = self.merge(topic, &digests, method).await?;
        if report.trim().is_empty() {
            return Err(ReportGenerationError::EmptyReport);
        }

        let report_path = store.save_report(
            session_id,
            self.report_model.model_name(),
            method.slug(),
            &report,
        )?;
        let reference_path = store.save_references(session_id, &references)?;

        tracing::info!(
            report = %report_path.display(),
            citations = citation_count,
            "report generated"
        );

        Ok(ReportArtifacts {
            report_path,
            reference_path,
            citation_count,
        })
    }

    /// Produces a digest per category, in plan order.
    ///
    /// Categories with a cached digest skip the model call. Categories
    /// without relevant results, and categories whose digest call fails,
    /// are skipped with a log line.
    async fn gather_digests<S: Store>(
        &self,
        store: &S,
        session_id: &str,
        topic: &str,
        plan: &Plan,
    ) -> Result<Vec<CategoryDigest>, ReportGenerationError> {
        let mut digests = Vec::new();

        for category in &plan.categories {
            match store.load_digest(session_id, &category.name) {
                Ok(Some(digest)) => {
                    tracing::debug!(category = %category.name, "reusing cached digest");
                    digests.push(digest);
                    continue;
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(
                        category = %category.name,
                        error = %err,
                        "unreadable digest cache, regenerating"
                    );
                }
            }

            let records = store.load_category_results(session_id, &category.name)?;
            let relevant: Vec<&SearchResult> = records
                .iter()
                .flat_map(|r| r.results.iter())
                .filter(|r| r.is_relevant(self.min_score))
                .collect();

            if relevant.is_empty() {
                tracing::info!(category = %category.name, "no relevant results, skipping digest");
                continue;
            }

            let resources = format_resources(&relevant);
            let prompt = build_digest_prompt(topic, &category.name, &category.goal, &resources);

            match self.digest_model.complete(&prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    let digest = CategoryDigest {
                        category: category.name.clone(),
                        digest: text,
                    };
                    store.save_digest(session_id, &digest)?;
                    digests.push(digest);
                }
                Ok(_) => {
                    tracing::warn!(category = %category.name, "model returned empty digest, skipping");
                }
                Err(err) => {
                    tracing::warn!(
                        category = %category.name,
                        error = %err,
                        "digest generation failed, continuing"
                    );
                }
            }
        }

        Ok(digests)
    }

    /// Builds the `## Reference` list from every relevant stored result.
    ///
    /// URLs are deduplicated; the first title seen for a URL wins.
    fn collect_references<S: Store>(
        &self,
        store: &S,
        session_id: &str,
        plan: &Plan,
    ) -> Result<(String, usize), StoreError> {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();

        for category in &plan.categories {
            for record in store.load_category_results(session_id, &category.name)? {
                for result in record.results.iter().filter(|r| r.is_relevant(self.min_score)) {
                    if seen.insert(result.url.clone()) {
                        lines.push(format!("- [{}]({})", result.title, result.url));
                    }
                }
            }
        }

        let mut content = String::from("## Reference\n\n");
        content.push_str(&lines.join("\n"));
        content.push('\n');

        Ok((content, lines.len()))
    }

    /// Merges the category digests into the final report.
    async fn merge(
        &self,
        topic: &str,
        digests: &[CategoryDigest],
        method: ReportMethod,
    ) -> Result<String, ReportGenerationError> {
        let system = build_report_system(
            method.instructions(),
            &self.config.language,
            self.config.injection.as_deref(),
        );
        let literature = format_digests(digests);
        let prompt = build_report_prompt(topic, &literature);

        let report = self.report_model.complete_with_system(&system, &prompt).await?;
        Ok(report)
    }
}

/// Formats relevant results as numbered source blocks for a digest prompt.
fn format_resources(results: &[&SearchResult]) -> String {
    let mut out = String::new();
    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!(
            "### Source {}: {}\nURL: {}\n\n{}\n\n",
            i + 1,
            result.title,
            result.url,
            truncate_chars(result.best_content(), MAX_RESOURCE_CHARS)
        ));
    }
    out
}

/// Formats the digests as one literature block for the merge prompt.
fn format_digests(digests: &[CategoryDigest]) -> String {
    digests
        .iter()
        .map(|d| format!("## {}\n\n{}", d.category, d.digest))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Cuts a string to at most `max` characters, on a character boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportGenerationError {
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Model produced an empty report")]
    EmptyReport,
}
