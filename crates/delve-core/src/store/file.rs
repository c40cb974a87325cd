use std::fs;
use std::path::{Path, PathBuf};

use crate::config::StorageConfig;
use crate::pipeline::CategoryDigest;
use crate::search::QueryResults;
use crate::session::{Session, SessionSummary};

use super::error::StoreError;
use super::Store;

/// File-based store implementation.
///
/// Lays out one directory per session under the output root:
/// ```text
/// output/RS_20250210_214128/
///   RS_20250210_214128_meta.json              # Session metadata
///   Market_Landscape/                         # One directory per category
///     vector_database_vendors.json            # One file per executed query
///   Market_Landscape_digest.json              # Cached category digest
///   RS_20250210_214128_gpt_4o_detailed.md     # Final report(s)
///   RS_20250210_214128_reference.md           # Deduplicated source list
/// ```
///
/// Category and query names pass through [`sanitize_filename`] before
/// they touch the file system.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a new FileStore rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a new FileStore from the storage configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.output_dir)
    }

    /// Returns the path to a session's directory.
    fn session_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// Returns the path to a session's metadata file.
    fn meta_path(&self, id: &str) -> PathBuf {
        self.session_dir(id).join(format!("{id}_meta.json"))
    }

    /// Returns the path to a category's results directory.
    fn category_dir(&self, id: &str, category: &str) -> PathBuf {
        self.session_dir(id).join(sanitize_filename(category))
    }

    /// Returns the path to one query's results file.
    fn result_path(&self, id: &str, category: &str, query: &str) -> PathBuf {
        self.category_dir(id, category)
            .join(format!("{}.json", sanitize_filename(query)))
    }

    /// Returns the path to a category's cached digest.
    fn digest_path(&self, id: &str, category: &str) -> PathBuf {
        self.session_dir(id)
            .join(format!("{}_digest.json", sanitize_filename(category)))
    }

    /// Returns the path to a report file for the given model and method.
    fn report_path(&self, id: &str, model: &str, method: &str) -> PathBuf {
        self.session_dir(id)
            .join(format!("{id}_{}_{method}.md", sanitize_filename(model)))
    }

    /// Returns the path to the reference list file.
    fn reference_path(&self, id: &str) -> PathBuf {
        self.session_dir(id).join(format!("{id}_reference.md"))
    }

    /// Ensures a directory exists.
    fn ensure_dir(&self, dir: &Path) -> Result<(), StoreError> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }
        Ok(())
    }
}

impl Store for FileStore {
    fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        self.ensure_dir(&self.session_dir(&session.id))?;

        let path = self.meta_path(&session.id);
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&path, json).map_err(|e| StoreError::io(&path, e))?;

        Ok(())
    }

    fn load_session(&self, id: &str) -> Result<Session, StoreError> {
        let path = self.meta_path(id);
        if !path.exists() {
            return Err(StoreError::SessionNotFound(id.to_string()));
        }

        let json = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let session: Session = serde_json::from_str(&json)?;

        Ok(session)
    }

    fn list_sessions(&self) -> Result<Vec<SessionSummary>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut summaries = Vec::new();

        let entries = fs::read_dir(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.root, e))?;
            let path = entry.path();

            if path.is_dir() {
                if let Some(id) = path.file_name().and_then(|n| n.to_str()) {
                    match self.load_session(id) {
                        Ok(session) => summaries.push(session.to_summary()),
                        Err(_) => continue, // Skip directories without valid metadata
                    }
                }
            }
        }

        // Sort by updated_at descending (most recent first)
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        Ok(summaries)
    }

    fn save_results(
        &self,
        id: &str,
        category: &str,
        results: &QueryResults,
    ) -> Result<(), StoreError> {
        self.ensure_dir(&self.category_dir(id, category))?;

        let path = self.result_path(id, category, &results.query);
        let json = serde_json::to_string_pretty(results)?;
        fs::write(&path, json).map_err(|e| StoreError::io(&path, e))?;

        Ok(())
    }

    fn load_category_results(
        &self,
        id: &str,
        category: &str,
    ) -> Result<Vec<QueryResults>, StoreError> {
        let dir = self.category_dir(id, category);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        // Directory order is platform-dependent; sort for stable output
        paths.sort();

        let mut all = Vec::new();
        for path in paths {
            let json = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
            match serde_json::from_str(&json) {
                Ok(results) => all.push(results),
                Err(_) => continue, // Skip unreadable result files
            }
        }

        Ok(all)
    }

    fn save_digest(&self, id: &str, digest: &CategoryDigest) -> Result<(), StoreError> {
        self.ensure_dir(&self.session_dir(id))?;

        let path = self.digest_path(id, &digest.category);
        let json = serde_json::to_string_pretty(digest)?;
        fs::write(&path, json).map_err(|e| StoreError::io(&path, e))?;

        Ok(())
    }

    fn load_digest(&self, id: &str, category: &str) -> Result<Option<CategoryDigest>, StoreError> {
        let path = self.digest_path(id, category);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let digest: CategoryDigest = serde_json::from_str(&json)?;

        Ok(Some(digest))
    }

    fn save_report(
        &self,
        id: &str,
        model: &str,
        method: &str,
        content: &str,
    ) -> Result<PathBuf, StoreError> {
        self.ensure_dir(&self.session_dir(id))?;

        let path = self.report_path(id, model, method);
        fs::write(&path, content).map_err(|e| StoreError::io(&path, e))?;

        Ok(path)
    }

    fn save_references(&self, id: &str, content: &str) -> Result<PathBuf, StoreError> {
        self.ensure_dir(&self.session_dir(id))?;

        let path = self.reference_path(id);
        fs::write(&path, content).map_err(|e| StoreError::io(&path, e))?;

        Ok(path)
    }
}

/// Makes a category, query, or model name safe to use as a file name.
///
/// Keeps alphanumeric characters and underscores, collapses runs of
/// whitespace and hyphens into single underscores, and drops everything
/// else.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_gap = false;

    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' {
            if pending_gap && !out.is_empty() {
                out.push('_');
            }
            pending_gap = false;
            out.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_gap = true;
        }
        // Everything else is dropped outright
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_spaces() {
        assert_eq!(sanitize_filename("Market Landscape"), "Market_Landscape");
        assert_eq!(sanitize_filename("a  b   c"), "a_b_c");
    }

    #[test]
    fn test_sanitize_hyphens_and_punctuation() {
        assert_eq!(sanitize_filename("state-of-the-art"), "state_of_the_art");
        assert_eq!(sanitize_filename("C++ memory safety?"), "C_memory_safety");
        assert_eq!(
            sanitize_filename("google/gemini-2.0-pro-exp-02-05:free"),
            "googlegemini_20_pro_exp_02_05free"
        );
    }

    #[test]
    fn test_sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_filename("量子 计算"), "量子_计算");
    }

    #[test]
    fn test_sanitize_trims_edges() {
        assert_eq!(sanitize_filename("  padded  "), "padded");
        assert_eq!(sanitize_filename("trailing-"), "trailing");
    }
}
