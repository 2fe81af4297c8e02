//! Opaque incremental chunks as emitted by the execution engine.
//!
//! Chunk shapes vary by producer: JSON-speaking engines send key-value
//! mappings, in-process producers hand over typed records. Every field is
//! optional and independently present; the pipeline treats absence and
//! emptiness identically.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::tool::UNKNOWN_TOOL;

/// A single incremental unit of an agent or team run.
///
/// Created by the engine, consumed exactly once by the aggregator, never
/// retained.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<RawToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_steps: Option<Vec<RawReasoningPart>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_messages: Option<Vec<RawReasoningPart>>,
}

/// One raw tool-call record before normalization.
///
/// Mapping records come in over the wire; typed records are built by
/// in-process producers. Both resolve through the same accessors, with
/// `"Unknown"` / `{}` substituted when a field is missing or unusable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawToolCall {
    Mapping(Map<String, Value>),
    Typed(ToolInvocation),
}

/// Attribute-bearing tool-call record for programmatic construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: Option<String>,
    pub arguments: Option<Map<String, Value>>,
}

impl RawToolCall {
    /// Tool name, defaulting to `"Unknown"` when absent or not a string.
    pub fn name(&self) -> String {
        match self {
            RawToolCall::Mapping(map) => map
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_TOOL)
                .to_string(),
            RawToolCall::Typed(inv) => inv
                .name
                .clone()
                .unwrap_or_else(|| UNKNOWN_TOOL.to_string()),
        }
    }

    /// Tool arguments, defaulting to an empty mapping.
    pub fn arguments(&self) -> Map<String, Value> {
        match self {
            RawToolCall::Mapping(map) => map
                .get("arguments")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            RawToolCall::Typed(inv) => inv.arguments.clone().unwrap_or_default(),
        }
    }
}

/// One raw reasoning step or message attached to a chunk.
///
/// Mapping parts carry their text under a `content` key; anything else is
/// rendered as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawReasoningPart {
    Text(String),
    Mapping(Map<String, Value>),
    Other(Value),
}

impl RawReasoningPart {
    /// Human-readable text of this part.
    pub fn text(&self) -> String {
        match self {
            RawReasoningPart::Text(s) => s.clone(),
            RawReasoningPart::Mapping(map) => match map.get("content") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => Value::Object(map.clone()).to_string(),
            },
            RawReasoningPart::Other(v) => v.to_string(),
        }
    }
}
