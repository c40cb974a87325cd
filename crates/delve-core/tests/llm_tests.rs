use delve_core::config::LLMConfig;
use delve_core::llm::json::{extract_json, parse_json_response, slice_to_json};
use delve_core::OpenAIClient;

// OpenAI-compatible client tests
mod openai {
    use super::*;

    #[test]
    fn test_client_creation() {
        let _client = OpenAIClient::new("https://api.example.com/v1", "test-key", "gpt-4");
    }

    #[test]
    fn test_openai_client() {
        let _client = OpenAIClient::openai("test-key", "gpt-4o");
    }

    #[test]
    fn test_url_trailing_slash_removed() {
        let _client = OpenAIClient::new("https://api.example.com/v1/", "key", "model");
    }

    #[test]
    fn test_builder_chain() {
        let _client = OpenAIClient::new("http://localhost:11434/v1", "", "llama3")
            .with_max_tokens(8192)
            .with_max_retries(0);
    }

    #[test]
    fn test_from_config_with_key() {
        let config = LLMConfig {
            api_key: Some("test-key".to_string()),
            ..LLMConfig::default()
        };
        let result = OpenAIClient::from_config(&config, "deepseek/deepseek-r1");
        assert!(result.is_ok());
    }
}

// JSON extraction tests
mod json {
    use super::*;

    #[test]
    fn test_fence_with_trailing_prose() {
        let raw = "```json\n{\"a\": 1}\n```\nAnything else I can do?";
        assert_eq!(extract_json(raw), r#"{"a": 1}"#);
    }

    #[test]
    fn test_slice_keeps_nested_braces() {
        let raw = r#"Here you go: {"plan": {"inner": true}} done."#;
        assert_eq!(slice_to_json(raw), r#"{"plan": {"inner": true}}"#);
    }

    #[test]
    fn test_parse_plan_shaped_reply() {
        #[derive(serde::Deserialize)]
        struct Reply {
            research_plan: Vec<Entry>,
        }

        #[derive(serde::Deserialize)]
        struct Entry {
            category: String,
            queries_list: Vec<String>,
        }

        let raw = concat!(
            "Of course! Here is the plan you asked for:\n",
            "```json\n",
            r#"{"research_plan": [{"category": "Hardware", "queries_list": ["q1", "q2"]}]}"#,
            "\n```",
        );

        let parsed: Reply = parse_json_response(raw).unwrap();
        assert_eq!(parsed.research_plan.len(), 1);
        assert_eq!(parsed.research_plan[0].category, "Hardware");
        assert_eq!(parsed.research_plan[0].queries_list, vec!["q1", "q2"]);
    }

    #[test]
    fn test_parse_braces_without_json_fails() {
        let raw = "Sorry, the {answer} is unclear.";
        let result: Result<serde_json::Value, _> = parse_json_response(raw);
        assert!(result.is_err());
    }
}
