//! Wire events delivered to streaming clients.
//!
//! One event is one line of output; events are strictly ordered as produced
//! and never revised after emission.

use serde::{Deserialize, Serialize};

use crate::types::tool::ToolCallRecord;

/// Typed envelope for one transport-level event.
///
/// Serialized with a `type` tag; every variant carries the ISO-8601
/// timestamp generated when the event was rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireEvent {
    ReasoningModeActive {
        content: String,
        timestamp: String,
    },
    ReasoningChunk {
        content: String,
        timestamp: String,
    },
    AnswerChunk {
        content: String,
        timestamp: String,
    },
    ContentChunk {
        content: String,
        timestamp: String,
    },
    Completion {
        tools_used: Vec<ToolCallRecord>,
        debug_info: DebugInfo,
        reasoning_content: String,
        answer_content: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        mode_used: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        total_tools: Option<usize>,
        timestamp: String,
    },
    Error {
        error: String,
        timestamp: String,
    },
}

impl WireEvent {
    /// Whether this is one of the terminal event types.
    pub fn is_terminal(&self) -> bool {
        matches!(self, WireEvent::Completion { .. } | WireEvent::Error { .. })
    }
}

/// Diagnostic trace kept alongside the flat usage list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    pub tool_calls: Vec<ToolCallRecord>,
}

/// Per-request accumulated state, exclusively owned by one stream invocation.
///
/// Created fresh per run and discarded after the terminal event; the usage
/// list and the debug trace grow through a single append path so their
/// lengths stay equal at every observation point.
#[derive(Debug, Clone, Default)]
pub struct RunTotals {
    pub tools_used: Vec<ToolCallRecord>,
    pub debug_info: DebugInfo,
    pub reasoning_text: String,
    pub answer_text: String,
}

impl RunTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one tool call in both tracking lists.
    pub fn push_tool(&mut self, record: ToolCallRecord) {
        self.debug_info.tool_calls.push(record.clone());
        self.tools_used.push(record);
    }
}
