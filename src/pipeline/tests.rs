#[cfg(test)]
mod tests {
    use crate::pipeline::classify::{
        self, ContentClass, ANSWER_MARKERS, REASONING_MARKERS, TOOL_EXECUTION_PATTERN,
    };
    use crate::pipeline::{emit, normalize, tool_call};
    use crate::types::chunk::{Chunk, RawToolCall, ToolInvocation};
    use crate::types::events::{RunTotals, WireEvent};
    use crate::types::tool::ToolCallRecord;
    use serde_json::json;

    fn raw_tool_call(value: serde_json::Value) -> RawToolCall {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_tool_execution_pattern_matches_log_lines() {
        let content = "search_web(query='x') completed in 1.23s. Here is the answer";
        let m = TOOL_EXECUTION_PATTERN.find(content).unwrap();
        assert_eq!(m.as_str(), "search_web(query='x') completed in 1.23s.");

        assert!(TOOL_EXECUTION_PATTERN.is_match("fetch_page(url) completed in 10s."));
        assert!(!TOOL_EXECUTION_PATTERN.is_match("search_web(query='x') completed"));
    }

    #[test]
    fn test_scrub_extracts_and_removes_in_order() {
        let content = "a(1) completed in 0.5s. middle b_tool(x=2) completed in 1.0s. tail";
        let scrubbed = classify::scrub_tool_logs(content);

        assert_eq!(
            scrubbed.fragments,
            vec![
                "a(1) completed in 0.5s.".to_string(),
                "b_tool(x=2) completed in 1.0s.".to_string(),
            ]
        );
        assert_eq!(scrubbed.clean.trim(), "middle  tail");
    }

    #[test]
    fn test_scrub_is_idempotent_on_clean_content() {
        let content = "search_web(query='x') completed in 1.23s. Here is the answer";
        let first = classify::scrub_tool_logs(content);
        let second = classify::scrub_tool_logs(&first.clean);

        assert!(second.fragments.is_empty());
        assert_eq!(second.clean, first.clean);
    }

    #[test]
    fn test_classification_routes_by_marker() {
        assert_eq!(
            classify::classify("**思考** let me think", true),
            ContentClass::Reasoning
        );
        assert_eq!(
            classify::classify("**回答**: the result is 42", true),
            ContentClass::Answer
        );
        // No marker at all falls back to answer.
        assert_eq!(
            classify::classify("plain text", true),
            ContentClass::Answer
        );
    }

    #[test]
    fn test_reasoning_wins_ties() {
        let both = format!("{} and {}", REASONING_MARKERS[0], ANSWER_MARKERS[0]);
        assert_eq!(classify::classify(&both, true), ContentClass::Reasoning);
    }

    #[test]
    fn test_classification_disabled_without_reasoning_mode() {
        assert_eq!(
            classify::classify("**思考** let me think", false),
            ContentClass::Answer
        );
    }

    #[test]
    fn test_extract_defaults_for_missing_fields() {
        // Mapping record with no name at all.
        let record = tool_call::extract(&raw_tool_call(json!({ "arguments": {} })));
        assert_eq!(record.name, "Unknown");
        assert!(record.arguments.is_empty());

        // Arguments of the wrong shape degrade to empty.
        let record = tool_call::extract(&raw_tool_call(json!({
            "name": "search",
            "arguments": "not a mapping"
        })));
        assert_eq!(record.name, "search");
        assert!(record.arguments.is_empty());
    }

    #[test]
    fn test_extract_reads_typed_record() {
        let record = tool_call::extract(&RawToolCall::Typed(ToolInvocation {
            name: None,
            arguments: None,
        }));
        assert_eq!(record.name, "Unknown");
        assert!(record.arguments.is_empty());

        let record = tool_call::extract(&RawToolCall::Typed(ToolInvocation {
            name: Some("arxiv".to_string()),
            arguments: json!({ "topic": "streams" }).as_object().cloned(),
        }));
        assert_eq!(record.name, "arxiv");
        assert_eq!(record.arguments.get("topic"), Some(&json!("streams")));
    }

    #[test]
    fn test_extract_reads_mapping_fields() {
        let record = tool_call::extract(&raw_tool_call(json!({
            "name": "web_search",
            "arguments": { "query": "rust" }
        })));
        assert_eq!(record.name, "web_search");
        assert_eq!(record.arguments.get("query"), Some(&json!("rust")));
    }

    #[test]
    fn test_think_tool_sentence() {
        let record = tool_call::extract(&raw_tool_call(json!({
            "name": "think",
            "arguments": { "thought": "considering options", "confidence": "high" }
        })));
        let sentence = tool_call::reasoning_sentence(&record).unwrap();
        assert_eq!(sentence, " 推論: considering options (信頼度: high)");
    }

    #[test]
    fn test_think_tool_sentence_with_title() {
        let record = ToolCallRecord::new(
            "think",
            json!({ "title": "Plan", "thought": "step one" })
                .as_object()
                .cloned()
                .unwrap(),
        );
        let sentence = tool_call::reasoning_sentence(&record).unwrap();
        assert_eq!(sentence, "🤔 Plan: step one");
    }

    #[test]
    fn test_think_tool_without_arguments_is_silent() {
        let record = ToolCallRecord::new("think", Default::default());
        assert!(tool_call::reasoning_sentence(&record).is_none());
    }

    #[test]
    fn test_think_tool_placeholder() {
        let record = ToolCallRecord::new(
            "reasoning",
            json!({ "other": 1 }).as_object().cloned().unwrap(),
        );
        let sentence = tool_call::reasoning_sentence(&record).unwrap();
        assert_eq!(sentence, " 推論: 思考中...");
    }

    #[test]
    fn test_invocation_sentence() {
        let record = ToolCallRecord::new("web_search", Default::default());
        assert_eq!(
            tool_call::invocation_sentence(&record),
            " ツール実行: web_search\n"
        );

        let record = ToolCallRecord::new(
            "web_search",
            json!({ "query": "rust" }).as_object().cloned().unwrap(),
        );
        let sentence = tool_call::invocation_sentence(&record);
        assert!(sentence.contains("   引数: {"));
        assert!(sentence.contains("\"query\": \"rust\""));
        assert!(sentence.ends_with('\n'));
    }

    #[test]
    fn test_normalize_treats_empty_as_absent() {
        let chunk = Chunk {
            content: Some(String::new()),
            tool_calls: Some(Vec::new()),
            ..Default::default()
        };
        let view = normalize::fields(&chunk);
        assert!(view.content.is_none());
        assert!(view.tool_calls.is_empty());
        assert!(view.reasoning_content.is_none());

        let chunk = Chunk {
            content: Some("hello".to_string()),
            reasoning_content: Some("because".to_string()),
            ..Default::default()
        };
        let view = normalize::fields(&chunk);
        assert_eq!(view.content, Some("hello"));
        assert_eq!(view.reasoning_content, Some("because"));
    }

    #[test]
    fn test_frame_format_preserves_non_ascii() {
        let frame = emit::frame(&emit::answer_chunk("**回答**: 結論です"));
        assert!(frame.starts_with("data: "));
        assert!(frame.ends_with("\n\n"));
        assert!(frame.contains("\"type\":\"answer_chunk\""));
        // Non-ASCII text goes out literally, never \u-escaped.
        assert!(frame.contains("**回答**: 結論です"));
        assert!(!frame.contains("\\u"));
    }

    #[test]
    fn test_completion_summary_fields() {
        let mut totals = RunTotals::new();
        totals.push_tool(ToolCallRecord::new("web_search", Default::default()));
        totals.answer_text.push_str("done");

        match emit::completion(&totals, None) {
            WireEvent::Completion {
                total_tools,
                mode_used,
                answer_content,
                tools_used,
                debug_info,
                ..
            } => {
                assert_eq!(total_tools, Some(1));
                assert_eq!(mode_used, None);
                assert_eq!(answer_content, "done");
                assert_eq!(tools_used.len(), debug_info.tool_calls.len());
            }
            other => panic!("unexpected event: {:?}", other),
        }

        match emit::completion(&totals, Some("core_route".to_string())) {
            WireEvent::Completion {
                total_tools,
                mode_used,
                ..
            } => {
                assert_eq!(total_tools, None);
                assert_eq!(mode_used.as_deref(), Some("core_route"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
