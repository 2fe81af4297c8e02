//! Chunk normalization (opaque chunk -> fixed-shape view)
//!
//! A field is considered present only if it exists on the chunk AND is
//! non-empty; absence and emptiness are treated identically. This is a
//! best-effort structural probe, not a schema validator — nothing here
//! ever fails.

use crate::types::chunk::{Chunk, RawReasoningPart, RawToolCall};

/// Uniform view over one chunk with only the truthy fields surfaced.
#[derive(Debug, Clone, Copy)]
pub struct ChunkFields<'a> {
    pub tool_calls: &'a [RawToolCall],
    pub content: Option<&'a str>,
    pub reasoning_content: Option<&'a str>,
    pub reasoning_steps: &'a [RawReasoningPart],
    pub reasoning_messages: &'a [RawReasoningPart],
}

/// Extract the normalized view of a chunk.
pub fn fields(chunk: &Chunk) -> ChunkFields<'_> {
    ChunkFields {
        tool_calls: non_empty_slice(&chunk.tool_calls),
        content: non_empty_str(&chunk.content),
        reasoning_content: non_empty_str(&chunk.reasoning_content),
        reasoning_steps: non_empty_slice(&chunk.reasoning_steps),
        reasoning_messages: non_empty_slice(&chunk.reasoning_messages),
    }
}

fn non_empty_str(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

fn non_empty_slice<T>(field: &Option<Vec<T>>) -> &[T] {
    match field {
        Some(items) if !items.is_empty() => items,
        _ => &[],
    }
}
