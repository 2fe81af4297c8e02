//! Tool-call extraction and rendering.
//!
//! Turns one raw tool-call record into a stable `{name, arguments}` pair
//! regardless of its raw shape, and renders the human-readable reasoning
//! sentences forwarded to streaming clients.

use serde_json::Value;

use crate::types::chunk::RawToolCall;
use crate::types::tool::ToolCallRecord;

/// Tool names treated as reasoning annotations rather than invocations.
pub const REASONING_ANNOTATION_TOOLS: &[&str] = &["think", "reasoning"];

const THINKING_PLACEHOLDER: &str = "思考中...";

/// Normalize one raw record. Missing fields fall back to defaults; this
/// never fails.
pub fn extract(raw: &RawToolCall) -> ToolCallRecord {
    ToolCallRecord::new(raw.name(), raw.arguments())
}

/// Whether the named tool is a reasoning annotation (`think` / `reasoning`).
pub fn is_reasoning_annotation(name: &str) -> bool {
    REASONING_ANNOTATION_TOOLS.contains(&name)
}

/// Render a reasoning annotation into a reasoning sentence.
///
/// Prefers `thought`, falls back to `reasoning`, then to a fixed
/// "thinking" placeholder. A `title` argument prefixes the sentence, a
/// `confidence` argument is appended. Returns `None` when the record
/// carries no arguments at all.
pub fn reasoning_sentence(record: &ToolCallRecord) -> Option<String> {
    if record.arguments.is_empty() {
        return None;
    }

    let thought = argument_text(record, "thought")
        .or_else(|| argument_text(record, "reasoning"))
        .unwrap_or_else(|| THINKING_PLACEHOLDER.to_string());

    let mut sentence = match argument_text(record, "title") {
        Some(title) => format!("🤔 {}: {}", title, thought),
        None => format!(" 推論: {}", thought),
    };
    if let Some(confidence) = argument_text(record, "confidence") {
        sentence.push_str(&format!(" (信頼度: {})", confidence));
    }
    Some(sentence)
}

/// Render a generic tool invocation into a reasoning sentence, with a
/// pretty-printed argument block when arguments are present.
pub fn invocation_sentence(record: &ToolCallRecord) -> String {
    let mut sentence = format!(" ツール実行: {}", record.name);
    if !record.arguments.is_empty() {
        let rendered = serde_json::to_string_pretty(&Value::Object(record.arguments.clone()))
            .unwrap_or_else(|_| "{}".to_string());
        sentence.push_str(&format!("\n   引数: {}", rendered));
    }
    sentence.push('\n');
    sentence
}

fn argument_text(record: &ToolCallRecord, key: &str) -> Option<String> {
    match record.arguments.get(key)? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
