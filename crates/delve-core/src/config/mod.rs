//! Configuration management for Delve.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `delve.toml` file
//! 3. User config `~/.config/delve/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration.
    pub llm: LLMConfig,

    /// Search API configuration.
    pub search: SearchConfig,

    /// Planning stage configuration.
    pub plan: PlanConfig,

    /// Report generation configuration.
    pub report: ReportConfig,

    /// Storage configuration.
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LLMConfig::default(),
            search: SearchConfig::default(),
            plan: PlanConfig::default(),
            report: ReportConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./delve.toml` (project local)
    /// 2. `~/.config/delve/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment variable overrides apply in every case.
    pub fn load() -> Result<Self, ConfigError> {
        // Try project-local config first
        if Path::new("delve.toml").exists() {
            return Self::from_file("delve.toml");
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("delve").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Use defaults
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // LLM overrides
        if let Ok(key) = std::env::var("OPENAI_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Ok(url) = std::env::var("OPENAI_BASE") {
            self.llm.base_url = Some(url);
        }
        if let Ok(model) = std::env::var("SMART_MODEL") {
            self.llm.smart_model = model;
        }
        if let Ok(model) = std::env::var("LONG_MODEL") {
            self.llm.long_model = model;
        }
        if let Ok(model) = std::env::var("REPORT_MODEL") {
            self.llm.report_model = model;
        }

        // Search overrides
        if let Ok(key) = std::env::var("TAVILY_API_KEY") {
            self.search.api_key = Some(key);
        }

        // Plan and report overrides
        if let Ok(extra) = std::env::var("PLAN_PROMPT") {
            self.plan.injection = Some(extra);
        }
        if let Ok(extra) = std::env::var("REPORT_PROMPT") {
            self.report.injection = Some(extra);
        }
        if let Ok(language) = std::env::var("DELVE_REPORT_LANGUAGE") {
            self.report.language = language;
        }

        // Storage overrides
        if let Ok(dir) = std::env::var("DELVE_OUTPUT_DIR") {
            self.storage.output_dir = dir;
        }
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// LLM provider configuration.
///
/// Delve talks to one OpenAI-compatible endpoint and picks a model per
/// pipeline step: a reasoning model for planning, a long-context model
/// for digests, and a writing model for the final report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// API key (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL for the API.
    pub base_url: Option<String>,

    /// Model for planning steps (translation, brief, query plan).
    pub smart_model: String,

    /// Long-context model for per-category digests.
    pub long_model: String,

    /// Model for the final report.
    pub report_model: String,

    /// Maximum tokens for response.
    pub max_tokens: u32,

    /// Retries for rate-limited or failed requests.
    pub max_retries: u32,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: None, // Load from env
            base_url: None,
            smart_model: DEFAULT_SMART_MODEL.to_string(),
            long_model: DEFAULT_LONG_MODEL.to_string(),
            report_model: DEFAULT_REPORT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl LLMConfig {
    /// Get the base URL, falling back to the default endpoint.
    pub fn base_url_or_default(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string())
    }

    /// Resolves the API key, preferring the config value over the
    /// `OPENAI_KEY` and `OPENAI_API_KEY` entries of the given lookup.
    pub fn resolve_api_key(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| env("OPENAI_KEY"))
            .or_else(|| env("OPENAI_API_KEY"))
    }
}

/// Search API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Tavily API key (can also be set via environment variable).
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Number of queries executed concurrently.
    pub concurrency: usize,

    /// Results scoring at or below this are dropped during synthesis.
    pub min_score: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None, // Load from env
            concurrency: DEFAULT_SEARCH_CONCURRENCY,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

impl SearchConfig {
    /// Resolves the API key, preferring the config value over the
    /// `TAVILY_API_KEY` entry of the given lookup.
    pub fn resolve_api_key(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.api_key.clone().or_else(|| env("TAVILY_API_KEY"))
    }
}

/// Planning stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Number of search queries requested per category.
    pub queries_per_category: usize,

    /// Extra instructions appended to the planning prompt.
    pub injection: Option<String>,

    /// Re-asks allowed when the model returns malformed JSON.
    pub max_repairs: u32,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            queries_per_category: DEFAULT_QUERIES_PER_CATEGORY,
            injection: None,
            max_repairs: DEFAULT_MAX_REPAIRS,
        }
    }
}

/// Report generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Language for generated reports.
    pub language: String,

    /// Extra instructions appended to the report prompt.
    pub injection: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_REPORT_LANGUAGE.to_string(),
            injection: None,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for session data (default: "output").
    pub output_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.smart_model, DEFAULT_SMART_MODEL);
        assert_eq!(config.search.concurrency, DEFAULT_SEARCH_CONCURRENCY);
        assert_eq!(config.plan.queries_per_category, DEFAULT_QUERIES_PER_CATEGORY);
        assert_eq!(config.report.language, DEFAULT_REPORT_LANGUAGE);
        assert_eq!(config.storage.output_dir, DEFAULT_OUTPUT_DIR);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[llm]"));
        assert!(toml_str.contains("[search]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[storage]"));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[llm]
smart_model = "gpt-4o"
max_retries = 5

[search]
concurrency = 8
min_score = 0.4

[report]
language = "German"

[storage]
output_dir = "research-data"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.smart_model, "gpt-4o");
        assert_eq!(config.llm.max_retries, 5);
        assert_eq!(config.llm.long_model, DEFAULT_LONG_MODEL);
        assert_eq!(config.search.concurrency, 8);
        assert_eq!(config.search.min_score, 0.4);
        assert_eq!(config.report.language, "German");
        assert_eq!(config.storage.output_dir, "research-data");
    }

    #[test]
    fn test_base_url_or_default() {
        let mut config = LLMConfig::default();
        assert_eq!(config.base_url_or_default(), DEFAULT_OPENAI_URL);

        config.base_url = Some("https://openrouter.ai/api/v1".to_string());
        assert_eq!(config.base_url_or_default(), "https://openrouter.ai/api/v1");
    }

    #[test]
    fn test_llm_api_key_resolution_order() {
        let mut config = LLMConfig::default();
        assert_eq!(config.resolve_api_key(|_| None), None);

        // OPENAI_KEY wins over OPENAI_API_KEY
        assert_eq!(
            config.resolve_api_key(|name| Some(format!("{name}-value"))),
            Some("OPENAI_KEY-value".to_string())
        );

        // A config value wins over the environment
        config.api_key = Some("config-key".to_string());
        assert_eq!(
            config.resolve_api_key(|name| Some(format!("{name}-value"))),
            Some("config-key".to_string())
        );
    }

    #[test]
    fn test_search_api_key_resolution_order() {
        let mut config = SearchConfig::default();
        assert_eq!(config.resolve_api_key(|_| None), None);
        assert_eq!(
            config.resolve_api_key(|name| {
                (name == "TAVILY_API_KEY").then(|| "tvly-key".to_string())
            }),
            Some("tvly-key".to_string())
        );

        config.api_key = Some("config-key".to_string());
        assert_eq!(config.resolve_api_key(|_| None), Some("config-key".to_string()));
    }
}
