//! Core type definitions shared across the gateway

pub mod chunk;
pub mod events;
pub mod tool;

pub use chunk::{Chunk, RawReasoningPart, RawToolCall};
pub use events::{DebugInfo, RunTotals, WireEvent};
pub use tool::{ToolCallRecord, ToolSpec};
