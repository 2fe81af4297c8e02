//! Execution-engine boundary.
//!
//! The engine that actually runs agents and teams is an external
//! collaborator; the gateway only assumes an object that accepts a query
//! plus a streaming flag and resolves to either a single terminal chunk or
//! an asynchronously-iterable sequence of chunks.

pub mod reasoning;
pub mod upstream;

use crate::types::chunk::Chunk;
use crate::types::tool::ToolSpec;
use crate::{BoxStream, Result};

pub use reasoning::{effective_tools, reasoning_tool};
pub use upstream::UpstreamProducer;

/// Outcome of one engine run.
pub enum RunOutput {
    /// Non-streaming run resolved to a single terminal chunk.
    Complete(Chunk),
    /// Streaming run yielding chunks incrementally.
    Streaming(BoxStream<'static, Chunk>),
}

/// Black-box producer of chunks for one execution target.
#[async_trait::async_trait]
pub trait ChunkProducer: Send + Sync {
    /// Execute a query against this target with the given per-request tool
    /// list, streaming incremental chunks when `stream` is set.
    async fn run(&self, query: &str, tools: &[ToolSpec], stream: bool) -> Result<RunOutput>;
}
