//! End-to-end aggregator tests over in-memory chunk producers.

mod common;

use std::sync::Arc;

use agent_relay::engine::ChunkProducer;
use agent_relay::pipeline::aggregate::{stream_events, ScopeLabel, StreamRequest};
use agent_relay::types::chunk::Chunk;
use agent_relay::types::events::WireEvent;
use agent_relay::types::tool::ToolSpec;
use agent_relay::{Error, PipeResult};
use futures::StreamExt;
use serde_json::json;

use common::{content_chunk, tool_call_chunk, ScriptedProducer, SingleShotProducer};

fn agent_request(producer: Arc<dyn ChunkProducer>, reasoning_mode: bool) -> StreamRequest {
    StreamRequest {
        label: ScopeLabel::Agent("web_search".to_string()),
        producer,
        base_tools: vec![ToolSpec::new("web_search", "", "search", "")],
        query: "what is rust".to_string(),
        reasoning_mode,
    }
}

fn team_request(producer: Arc<dyn ChunkProducer>, reasoning_mode: bool) -> StreamRequest {
    StreamRequest {
        label: ScopeLabel::Team("core_route".to_string()),
        producer,
        base_tools: Vec::new(),
        query: "what is rust".to_string(),
        reasoning_mode,
    }
}

async fn collect(request: StreamRequest) -> Vec<PipeResult<WireEvent>> {
    stream_events(request).collect().await
}

fn events(items: &[PipeResult<WireEvent>]) -> Vec<&WireEvent> {
    items.iter().filter_map(|i| i.as_ref().ok()).collect()
}

fn assert_single_terminal(items: &[PipeResult<WireEvent>]) {
    let events = events(items);
    let terminals = events.iter().filter(|e| e.is_terminal()).count();
    assert_eq!(terminals, 1, "expected exactly one terminal event");
    assert!(
        events.last().unwrap().is_terminal(),
        "terminal event must come last"
    );
}

#[tokio::test]
async fn tool_log_scrubbed_then_answer_forwarded() {
    let producer = ScriptedProducer::new(vec![Ok(content_chunk(
        "search_web(query='x') completed in 1.23s. Here is the answer",
    ))]);
    let items = collect(agent_request(producer, false)).await;
    let events = events(&items);

    match events[0] {
        WireEvent::ReasoningChunk { content, .. } => {
            assert!(content.contains("search_web(query='x') completed in 1.23s."));
            assert!(content.starts_with("⚡ "));
        }
        other => panic!("expected reasoning chunk first, got {:?}", other),
    }
    match events[1] {
        WireEvent::AnswerChunk { content, .. } => assert_eq!(content, "Here is the answer"),
        other => panic!("expected answer chunk, got {:?}", other),
    }
    match events[2] {
        WireEvent::Completion {
            reasoning_content,
            answer_content,
            total_tools,
            ..
        } => {
            assert!(reasoning_content.contains("search_web"));
            assert_eq!(answer_content, "Here is the answer");
            assert_eq!(*total_tools, Some(0));
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_single_terminal(&items);
}

#[tokio::test]
async fn think_tool_renders_reasoning_sentence() {
    let producer = ScriptedProducer::new(vec![Ok(tool_call_chunk(json!({
        "name": "think",
        "arguments": { "thought": "considering options", "confidence": "high" }
    })))]);
    let items = collect(team_request(producer, true)).await;
    let events = events(&items);

    // Banner first, then the rendered reasoning sentence.
    assert!(matches!(events[0], WireEvent::ReasoningModeActive { .. }));
    match events[1] {
        WireEvent::ReasoningChunk { content, .. } => {
            assert_eq!(content, " 推論: considering options (信頼度: high)");
        }
        other => panic!("expected reasoning chunk, got {:?}", other),
    }
    match events.last().unwrap() {
        WireEvent::Completion {
            tools_used,
            debug_info,
            mode_used,
            ..
        } => {
            assert_eq!(tools_used.len(), 1);
            assert_eq!(tools_used.len(), debug_info.tool_calls.len());
            assert_eq!(tools_used[0].name, "think");
            assert_eq!(mode_used.as_deref(), Some("core_route"));
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

#[tokio::test]
async fn answer_keyword_routes_to_answer_stream() {
    let producer = ScriptedProducer::new(vec![Ok(content_chunk("**回答**: the result is 42"))]);
    let items = collect(team_request(producer, true)).await;
    let events = events(&items);

    assert!(matches!(events[1], WireEvent::AnswerChunk { .. }));
    match events.last().unwrap() {
        WireEvent::Completion { answer_content, .. } => {
            assert_eq!(answer_content, "**回答**: the result is 42");
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

#[tokio::test]
async fn reasoning_keyword_routes_to_reasoning_stream() {
    let producer = ScriptedProducer::new(vec![
        Ok(content_chunk("**思考** first step")),
        Ok(content_chunk("**思考** second step")),
    ]);
    let items = collect(team_request(producer, true)).await;
    let events = events(&items);

    let reasoning: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, WireEvent::ReasoningChunk { .. }))
        .collect();
    assert_eq!(reasoning.len(), 2);
    match events.last().unwrap() {
        WireEvent::Completion {
            reasoning_content,
            answer_content,
            ..
        } => {
            // Accumulation is monotone across chunks, newline-joined.
            assert_eq!(reasoning_content, "**思考** first step\n**思考** second step\n");
            assert!(answer_content.is_empty());
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

#[tokio::test]
async fn producer_failure_emits_error_then_surfaces() {
    let producer = ScriptedProducer::new(vec![
        Ok(content_chunk("part one ")),
        Ok(content_chunk("part two")),
        Err(Error::producer("engine connection lost")),
    ]);
    let items = collect(agent_request(producer, false)).await;

    // Both chunks made it out before the failure.
    let answers = items
        .iter()
        .filter(|i| matches!(i, Ok(WireEvent::AnswerChunk { .. })))
        .count();
    assert_eq!(answers, 2);

    // Exactly one error event, no completion.
    let errors: Vec<_> = items
        .iter()
        .filter_map(|i| match i {
            Ok(WireEvent::Error { error, .. }) => Some(error.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("engine connection lost"));
    assert!(!items
        .iter()
        .any(|i| matches!(i, Ok(WireEvent::Completion { .. }))));

    // The failure itself is the final stream item.
    assert!(items.last().unwrap().is_err());
}

#[tokio::test]
async fn unnamed_tool_call_tracked_as_unknown() {
    let producer = ScriptedProducer::new(vec![Ok(tool_call_chunk(json!({ "arguments": {} })))]);
    let items = collect(team_request(producer, false)).await;

    match events(&items).last().unwrap() {
        WireEvent::Completion {
            tools_used,
            debug_info,
            ..
        } => {
            assert_eq!(tools_used.len(), 1);
            assert_eq!(tools_used[0].name, "Unknown");
            assert!(tools_used[0].arguments.is_empty());
            assert_eq!(debug_info.tool_calls, *tools_used);
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

#[tokio::test]
async fn per_chunk_event_order_is_stable() {
    let chunk = Chunk {
        tool_calls: Some(vec![serde_json::from_value(json!({
            "name": "web_search",
            "arguments": { "query": "rust" }
        }))
        .unwrap()]),
        content: Some("plain answer".to_string()),
        reasoning_content: Some("raw reasoning".to_string()),
        reasoning_steps: Some(vec![serde_json::from_value(json!({ "content": "step" })).unwrap()]),
        reasoning_messages: Some(vec![serde_json::from_value(json!("aside")).unwrap()]),
    };
    let producer = ScriptedProducer::new(vec![Ok(chunk)]);
    let items = collect(team_request(producer, false)).await;
    let events = events(&items);

    // Tool-call events, then content, then the reasoning fields, in order.
    match (events[0], events[1], events[2], events[3], events[4]) {
        (
            WireEvent::ReasoningChunk { content: tool, .. },
            WireEvent::AnswerChunk { content: answer, .. },
            WireEvent::ReasoningChunk { content: raw, .. },
            WireEvent::ReasoningChunk { content: step, .. },
            WireEvent::ReasoningChunk { content: message, .. },
        ) => {
            assert!(tool.contains(" ツール実行: web_search"));
            assert_eq!(answer, "plain answer");
            assert_eq!(raw, "raw reasoning");
            assert_eq!(step, "🤔 推論ステップ: step");
            assert_eq!(message, "💭 推論メッセージ: aside");
        }
        other => panic!("unexpected event order: {:?}", other),
    }
    assert!(matches!(events[5], WireEvent::Completion { .. }));
}

#[tokio::test]
async fn reasoning_mode_announces_and_injects_tool() {
    let producer = ScriptedProducer::new(vec![]);
    let scripted = producer.clone();
    let items = collect(agent_request(producer, true)).await;
    let events = events(&items);

    match events[0] {
        WireEvent::ReasoningModeActive { content, .. } => {
            assert_eq!(content, "Reasoning mode activated");
        }
        other => panic!("expected reasoning banner first, got {:?}", other),
    }

    let tool_lists = scripted.tool_lists();
    assert_eq!(tool_lists.len(), 1);
    assert_eq!(tool_lists[0], vec!["web_search", "reasoning"]);
    assert_single_terminal(&items);
}

#[tokio::test]
async fn tool_injection_does_not_accumulate_across_requests() {
    let base = vec![ToolSpec::new("web_search", "", "search", "")];

    for _ in 0..2 {
        let producer = ScriptedProducer::new(vec![]);
        let scripted = producer.clone();
        let request = StreamRequest {
            label: ScopeLabel::Agent("web_search".to_string()),
            producer,
            base_tools: base.clone(),
            query: "q".to_string(),
            reasoning_mode: true,
        };
        let _ = collect(request).await;
        assert_eq!(scripted.tool_lists()[0].len(), 2);
    }
}

#[tokio::test]
async fn tool_totals_accumulate_across_chunks() {
    let producer = ScriptedProducer::new(vec![
        Ok(tool_call_chunk(json!({ "name": "web_search", "arguments": {} }))),
        Ok(tool_call_chunk(json!({ "name": "web_search", "arguments": {} }))),
        Ok(tool_call_chunk(json!({ "name": "arxiv", "arguments": {} }))),
    ]);
    let items = collect(agent_request(producer, false)).await;

    match events(&items).last().unwrap() {
        WireEvent::Completion {
            tools_used,
            debug_info,
            total_tools,
            ..
        } => {
            // No de-duplication: repeated identical calls all accumulate.
            assert_eq!(tools_used.len(), 3);
            assert_eq!(debug_info.tool_calls.len(), 3);
            assert_eq!(*total_tools, Some(3));
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

#[tokio::test]
async fn single_shot_run_emits_content_chunk() {
    let chunk = Chunk {
        content: Some("the full answer".to_string()),
        tool_calls: Some(vec![serde_json::from_value(json!({
            "name": "web_search",
            "arguments": {}
        }))
        .unwrap()]),
        ..Default::default()
    };
    let items = collect(agent_request(SingleShotProducer::new(chunk), false)).await;
    let events = events(&items);

    match events[0] {
        WireEvent::ContentChunk { content, .. } => assert_eq!(content, "the full answer"),
        other => panic!("expected content chunk, got {:?}", other),
    }
    match events[1] {
        WireEvent::Completion {
            total_tools,
            answer_content,
            ..
        } => {
            assert_eq!(*total_tools, Some(1));
            assert_eq!(answer_content, "the full answer");
        }
        other => panic!("expected completion, got {:?}", other),
    }
    assert_single_terminal(&items);
}

#[tokio::test]
async fn empty_stream_still_completes() {
    let producer = ScriptedProducer::new(vec![]);
    let items = collect(agent_request(producer, false)).await;
    let events = events(&items);

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], WireEvent::Completion { .. }));
}
