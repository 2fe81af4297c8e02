//! # agent-relay
//!
//! Streaming gateway for multi-agent LLM execution. The gateway sits between
//! HTTP clients and an opaque agent-execution engine: it relays queries to
//! agents and teams, consumes the engine's loosely-typed incremental chunks,
//! and re-serializes them into a stable, typed Server-Sent-Events stream with
//! a terminal run summary.
//!
//! ## Overview
//!
//! The heart of the crate is the streaming classification pipeline: every
//! chunk pulled from a run is normalized into a fixed-shape view, its tool
//! calls are extracted into a running usage log, its content is scrubbed of
//! tool-execution noise and classified as reasoning or answer text, and the
//! resulting wire events are forwarded in arrival order. Exactly one terminal
//! event (`completion` or `error`) closes every stream.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`pipeline`] | Chunk normalization, classification, and stream aggregation |
//! | [`engine`] | Execution-engine boundary: chunk producers and tool injection |
//! | [`registry`] | Agent/team target registry with dynamic creation |
//! | [`server`] | HTTP routes and SSE response assembly |
//! | [`config`] | Settings loading (YAML file + environment overrides) |
//! | [`types`] | Core type definitions (chunks, tool calls, wire events) |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agent_relay::config::Settings;
//! use agent_relay::registry::TargetRegistry;
//! use agent_relay::server::{self, AppState};
//!
//! #[tokio::main]
//! async fn main() -> agent_relay::Result<()> {
//!     let settings = Settings::load()?;
//!     let registry = TargetRegistry::initialize(&settings)?;
//!     let app = server::router(AppState::new(settings, registry));
//!     // Serve `app` with axum...
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod pipeline;
pub mod registry;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use engine::{ChunkProducer, RunOutput};
pub use pipeline::aggregate::{ScopeLabel, StreamRequest};
pub use types::{
    chunk::{Chunk, RawReasoningPart, RawToolCall, ToolInvocation},
    events::{DebugInfo, RunTotals, WireEvent},
    tool::{ToolCallRecord, ToolSpec},
};

use futures::Stream;
use std::pin::Pin;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// A specialized Result for pipeline operations
pub type PipeResult<T> = std::result::Result<T, Error>;

/// A unified pinned, boxed stream that emits `PipeResult<T>`
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = PipeResult<T>> + Send + 'a>>;

/// Error type for the library
pub mod error;
pub use error::Error;
