use delve_core::search::{QueryResults, SearchResult};

// Wire compatibility: results parsed straight from API-shaped JSON
mod wire {
    use super::*;

    #[test]
    fn test_results_parse_from_api_payload() {
        // Fields we do not model, like published_date, must not break parsing
        let payload = serde_json::json!([
            {
                "title": "Quantum roadmap 2026",
                "url": "https://example.com/roadmap",
                "content": "snippet text",
                "raw_content": "full page text",
                "score": 0.93,
                "published_date": "2026-01-15"
            },
            {
                "url": "https://example.com/bare",
                "raw_content": null
            }
        ]);

        let results: Vec<SearchResult> = serde_json::from_value(payload).unwrap();
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].title, "Quantum roadmap 2026");
        assert_eq!(results[0].raw_content.as_deref(), Some("full page text"));
        assert!(results[0].score > 0.9);

        // Missing fields fall back to defaults instead of failing the batch
        assert_eq!(results[1].title, "");
        assert_eq!(results[1].content, "");
        assert!(results[1].raw_content.is_none());
        assert_eq!(results[1].score, 0.0);
        assert!(!results[1].is_relevant(0.6));
    }

    #[test]
    fn test_url_is_required() {
        let payload = serde_json::json!({"title": "No link", "score": 0.9});
        let result: Result<SearchResult, _> = serde_json::from_value(payload);
        assert!(result.is_err());
    }
}

// Stored shape: what the executor writes and the reporter reads back
mod stored {
    use super::*;

    #[test]
    fn test_query_results_roundtrip_shape() {
        let record = QueryResults {
            query: "superconducting qubit roadmap".to_string(),
            results: vec![SearchResult {
                title: "Roadmap".to_string(),
                url: "https://example.com/roadmap".to_string(),
                content: "snippet".to_string(),
                raw_content: None,
                score: 0.8,
            }],
        };

        let json = serde_json::to_string_pretty(&record).unwrap();

        // Absent raw content is omitted from the file entirely
        assert!(!json.contains("raw_content"));
        assert!(json.contains("\"query\": \"superconducting qubit roadmap\""));

        let parsed: QueryResults = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.query, record.query);
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].url, "https://example.com/roadmap");
    }
}
