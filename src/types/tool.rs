//! Tool usage records and tool catalog entries

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name substituted when a tool-call record carries no usable name.
pub const UNKNOWN_TOOL: &str = "Unknown";

/// One normalized tool invocation as tracked for observability.
///
/// Produced from a raw record of any shape; immutable once created and
/// appended to both the flat usage list and the debug trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCallRecord {
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// A capability an execution target may use, as advertised to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub category: String,
    pub example_usage: String,
}

impl ToolSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        example_usage: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: category.into(),
            example_usage: example_usage.into(),
        }
    }
}
