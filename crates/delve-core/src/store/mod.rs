mod error;
mod file;

pub use error::StoreError;
pub use file::{sanitize_filename, FileStore};

use std::path::PathBuf;

use crate::pipeline::CategoryDigest;
use crate::search::QueryResults;
use crate::session::{Session, SessionSummary};

/// Trait for session storage backends.
///
/// Implementations persist sessions and their artifacts so that an
/// interrupted run can resume from whatever stage it reached. Every
/// write lands before the next pipeline step starts.
pub trait Store {
    /// Saves session metadata.
    fn save_session(&self, session: &Session) -> Result<(), StoreError>;

    /// Loads session metadata by ID.
    fn load_session(&self, id: &str) -> Result<Session, StoreError>;

    /// Lists all sessions as summaries, most recently updated first.
    fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError>;

    /// Saves the results of one executed query under its category.
    ///
    /// Re-running the same query overwrites the previous results.
    fn save_results(
        &self,
        id: &str,
        category: &str,
        results: &QueryResults,
    ) -> Result<(), StoreError>;

    /// Loads all stored query results for a category.
    ///
    /// Returns an empty list when the category has no results on disk.
    fn load_category_results(&self, id: &str, category: &str)
        -> Result<Vec<QueryResults>, StoreError>;

    /// Saves a category digest, overwriting any cached one.
    fn save_digest(&self, id: &str, digest: &CategoryDigest) -> Result<(), StoreError>;

    /// Loads the cached digest for a category, if one exists.
    fn load_digest(&self, id: &str, category: &str) -> Result<Option<CategoryDigest>, StoreError>;

    /// Saves a final report and returns the path it was written to.
    fn save_report(
        &self,
        id: &str,
        model: &str,
        method: &str,
        content: &str,
    ) -> Result<PathBuf, StoreError>;

    /// Saves the reference list and returns the path it was written to.
    fn save_references(&self, id: &str, content: &str) -> Result<PathBuf, StoreError>;
}
