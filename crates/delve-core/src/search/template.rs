/// Parameters for one search API call.
///
/// The named constructors are presets tuned for different kinds of
/// research: everyday lookups, deep dives, current events, and
/// academic sources.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams {
    /// Search depth: "basic" or "advanced"
    pub search_depth: String,
    /// Maximum number of results to return
    pub max_results: u32,
    /// Whether to fetch the full page text alongside the snippet
    pub include_raw_content: bool,
    /// Search topic hint, e.g. "news" or "general"
    pub topic: Option<String>,
    /// Restrict results to these domains (empty = no restriction)
    pub include_domains: Vec<String>,
    /// Drop results from these domains
    pub exclude_domains: Vec<String>,
}

impl SearchParams {
    /// Quick lookup: shallow search, few results.
    pub fn basic() -> Self {
        Self {
            search_depth: "basic".to_string(),
            max_results: 5,
            include_raw_content: true,
            topic: None,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
        }
    }

    /// Deep dive: advanced search with a wider result set.
    pub fn advanced() -> Self {
        Self {
            search_depth: "advanced".to_string(),
            max_results: 10,
            include_raw_content: true,
            topic: None,
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
        }
    }

    /// Current events: advanced search against the news index.
    pub fn news() -> Self {
        Self {
            search_depth: "advanced".to_string(),
            max_results: 8,
            include_raw_content: true,
            topic: Some("news".to_string()),
            include_domains: Vec::new(),
            exclude_domains: Vec::new(),
        }
    }

    /// Academic sources: advanced search restricted to scholarly domains.
    pub fn academic() -> Self {
        Self {
            search_depth: "advanced".to_string(),
            max_results: 15,
            include_raw_content: true,
            topic: Some("general".to_string()),
            include_domains: vec![
                ".edu".to_string(),
                ".org".to_string(),
                "scholar.google.com".to_string(),
            ],
            exclude_domains: Vec::new(),
        }
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::advanced()
    }
}
