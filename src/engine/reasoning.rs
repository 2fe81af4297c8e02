//! Per-request reasoning-tool injection.
//!
//! The tool list handed to the engine is computed fresh for every request;
//! registry targets are never mutated, so repeated reasoning-mode requests
//! against the same target cannot accumulate extra copies.

use crate::types::tool::ToolSpec;

/// Name of the injected reasoning capability.
pub const REASONING_TOOL_NAME: &str = "reasoning";

/// The reasoning capability appended when reasoning mode is requested.
pub fn reasoning_tool() -> ToolSpec {
    ToolSpec::new(
        REASONING_TOOL_NAME,
        "Structured step-by-step reasoning support",
        "analysis",
        "Break a complex question into explicit reasoning steps",
    )
}

/// Effective tool list for one request.
pub fn effective_tools(base_tools: &[ToolSpec], reasoning_requested: bool) -> Vec<ToolSpec> {
    let mut tools = base_tools.to_vec();
    if reasoning_requested {
        tools.push(reasoning_tool());
    }
    tools
}
