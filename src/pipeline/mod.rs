//! Streaming classification pipeline.
//!
//! This module is the core execution engine of the gateway: it consumes the
//! heterogeneous incremental chunks of one agent or team run and produces an
//! ordered, typed sequence of wire events plus a terminal aggregate.
//!
//! ## Pipeline Stages
//!
//! ```text
//! Chunks → Normalizer → Tool extractor / Classifier → Emitter → Wire events
//!    │          │               │                        │
//!    │     fixed-shape     usage log,              SSE frames,
//!  engine      view        reasoning/answer        timestamps
//! ```
//!
//! ## Submodules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`normalize`] | Best-effort structural probe over opaque chunks |
//! | [`tool_call`] | Tool-call normalization and reasoning sentences |
//! | [`classify`] | Tool-log scrubbing and reasoning/answer routing |
//! | [`emit`] | Wire-envelope rendering with render-time timestamps |
//! | [`aggregate`] | End-to-end per-request stream loop |

pub mod aggregate;
pub mod classify;
pub mod emit;
pub mod normalize;
pub mod tool_call;

#[cfg(test)]
mod tests;

pub use aggregate::{stream_events, ScopeLabel, StreamRequest};
