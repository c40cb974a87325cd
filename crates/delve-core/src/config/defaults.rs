//! Default values for Delve configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// LLM Defaults
// ============================================================================

/// Default OpenAI-compatible API URL.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default model for planning steps (translation, brief, query plan).
pub const DEFAULT_SMART_MODEL: &str = "deepseek/deepseek-r1";

/// Default long-context model for per-category digests.
pub const DEFAULT_LONG_MODEL: &str = "google/gemini-2.0-flash-001";

/// Default model for the final report.
pub const DEFAULT_REPORT_MODEL: &str = "google/gemini-2.0-pro-exp-02-05:free";

/// Default max tokens for LLM responses.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default number of retries for rate-limited or failed requests.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Base delay for retry backoff, in milliseconds. Doubles per attempt.
pub const DEFAULT_RETRY_BASE_MS: u64 = 500;

/// Ceiling for the retry backoff delay, in milliseconds.
pub const DEFAULT_RETRY_MAX_MS: u64 = 30_000;

// ============================================================================
// Search Defaults
// ============================================================================

/// Default Tavily API URL.
pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com";

/// Default number of queries executed concurrently.
pub const DEFAULT_SEARCH_CONCURRENCY: usize = 4;

/// Results scoring at or below this are dropped during synthesis.
pub const DEFAULT_MIN_SCORE: f64 = 0.6;

// ============================================================================
// Plan Defaults
// ============================================================================

/// Default number of search queries requested per category.
pub const DEFAULT_QUERIES_PER_CATEGORY: usize = 3;

/// Default number of re-asks when the model returns malformed JSON.
pub const DEFAULT_MAX_REPAIRS: u32 = 2;

// ============================================================================
// Report Defaults
// ============================================================================

/// Default language for generated reports.
pub const DEFAULT_REPORT_LANGUAGE: &str = "English";

// ============================================================================
// Storage Defaults
// ============================================================================

/// Default directory for session data, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";
