//! Wire-envelope rendering.
//!
//! Events are stamped with a freshly generated ISO-8601 timestamp when they
//! are rendered, not when the underlying fragment was produced, and are
//! yielded immediately — nothing here buffers or reorders. Frames are UTF-8
//! with non-ASCII characters preserved literally.

use chrono::{SecondsFormat, Utc};
use tracing::warn;

use crate::types::events::{RunTotals, WireEvent};

/// Fixed banner sent when reasoning mode is activated.
pub const REASONING_MODE_BANNER: &str = "Reasoning mode activated";

/// SSE frame prefix and delimiter.
pub const FRAME_PREFIX: &str = "data: ";
pub const FRAME_DELIMITER: &str = "\n\n";

/// Current time as an ISO-8601 string.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn reasoning_mode_active() -> WireEvent {
    WireEvent::ReasoningModeActive {
        content: REASONING_MODE_BANNER.to_string(),
        timestamp: timestamp(),
    }
}

pub fn reasoning_chunk(content: impl Into<String>) -> WireEvent {
    WireEvent::ReasoningChunk {
        content: content.into(),
        timestamp: timestamp(),
    }
}

pub fn answer_chunk(content: impl Into<String>) -> WireEvent {
    WireEvent::AnswerChunk {
        content: content.into(),
        timestamp: timestamp(),
    }
}

pub fn content_chunk(content: impl Into<String>) -> WireEvent {
    WireEvent::ContentChunk {
        content: content.into(),
        timestamp: timestamp(),
    }
}

/// Terminal summary for a successful stream. Team runs report the team key
/// as `mode_used`; agent runs report the tool total instead.
pub fn completion(totals: &RunTotals, mode_used: Option<String>) -> WireEvent {
    let total_tools = match mode_used {
        Some(_) => None,
        None => Some(totals.tools_used.len()),
    };
    WireEvent::Completion {
        tools_used: totals.tools_used.clone(),
        debug_info: totals.debug_info.clone(),
        reasoning_content: totals.reasoning_text.clone(),
        answer_content: totals.answer_text.clone(),
        mode_used,
        total_tools,
        timestamp: timestamp(),
    }
}

pub fn error(message: impl Into<String>) -> WireEvent {
    WireEvent::Error {
        error: message.into(),
        timestamp: timestamp(),
    }
}

/// Render one event as an SSE frame: `data: <json>\n\n`.
///
/// A field that cannot be rendered must not crash the stream; the frame is
/// replaced by a minimal error payload and processing continues.
pub fn frame(event: &WireEvent) -> String {
    match serde_json::to_string(event) {
        Ok(json) => format!("{}{}{}", FRAME_PREFIX, json, FRAME_DELIMITER),
        Err(err) => {
            warn!(error = %err, "failed to serialize wire event, sending fallback");
            let detail = err.to_string().replace('"', "'");
            format!(
                "{}{{\"type\":\"error\",\"error\":\"event serialization failed: {}\",\"timestamp\":\"{}\"}}{}",
                FRAME_PREFIX,
                detail,
                timestamp(),
                FRAME_DELIMITER
            )
        }
    }
}
