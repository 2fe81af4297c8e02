//! End-to-end stream aggregation.
//!
//! Drives the per-request loop over a chunk producer: optional reasoning-mode
//! announcement, per-chunk classification in arrival order, accumulation of
//! the run totals, and exactly one terminal event. Producer failures emit an
//! `error` event and then surface as the stream's final `Err` item on both
//! the agent and the team path.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info};

use crate::engine::{effective_tools, ChunkProducer, RunOutput};
use crate::pipeline::classify::{self, ContentClass};
use crate::pipeline::{emit, normalize, tool_call};
use crate::types::chunk::Chunk;
use crate::types::events::{RunTotals, WireEvent};
use crate::types::tool::ToolSpec;
use crate::{BoxStream, PipeResult};

const PREVIEW_CHARS: usize = 50;

/// Which kind of target a stream addresses. Teams report their key in the
/// completion summary; agents report the tool total instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeLabel {
    Agent(String),
    Team(String),
}

impl ScopeLabel {
    pub fn key(&self) -> &str {
        match self {
            ScopeLabel::Agent(key) | ScopeLabel::Team(key) => key,
        }
    }

    fn mode_used(&self) -> Option<String> {
        match self {
            ScopeLabel::Agent(_) => None,
            ScopeLabel::Team(key) => Some(key.clone()),
        }
    }
}

impl fmt::Display for ScopeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeLabel::Agent(key) => write!(f, "agent:{}", key),
            ScopeLabel::Team(key) => write!(f, "team:{}", key),
        }
    }
}

/// One stream invocation.
pub struct StreamRequest {
    pub label: ScopeLabel,
    pub producer: Arc<dyn ChunkProducer>,
    pub base_tools: Vec<ToolSpec>,
    pub query: String,
    pub reasoning_mode: bool,
}

/// Run one query against its target and return the ordered event stream.
///
/// The stream yields `Ok(WireEvent)` items ending in exactly one terminal
/// event; after an `error` event the producer failure follows as a final
/// `Err` item so callers can distinguish failed runs.
pub fn stream_events(request: StreamRequest) -> BoxStream<'static, WireEvent> {
    let StreamRequest {
        label,
        producer,
        base_tools,
        query,
        reasoning_mode,
    } = request;

    info!(scope = %label, reasoning = reasoning_mode, "starting stream");

    let session = Session {
        label,
        producer,
        tools: effective_tools(&base_tools, reasoning_mode),
        query,
        reasoning_mode,
        totals: RunTotals::new(),
        queue: VecDeque::new(),
        phase: Phase::Announce,
    };

    Box::pin(stream::unfold(session, |mut session| async move {
        let item = session.advance().await?;
        Some((item, session))
    }))
}

enum Phase {
    Announce,
    Connect,
    Streaming(BoxStream<'static, Chunk>),
    Finished,
}

struct Session {
    label: ScopeLabel,
    producer: Arc<dyn ChunkProducer>,
    tools: Vec<ToolSpec>,
    query: String,
    reasoning_mode: bool,
    totals: RunTotals,
    queue: VecDeque<PipeResult<WireEvent>>,
    phase: Phase,
}

impl Session {
    /// Produce the next stream item, pulling chunks as needed. One event is
    /// handed out per call; the producer is only polled again once the
    /// pending queue has drained.
    async fn advance(&mut self) -> Option<PipeResult<WireEvent>> {
        loop {
            if let Some(item) = self.queue.pop_front() {
                return Some(item);
            }

            match std::mem::replace(&mut self.phase, Phase::Finished) {
                Phase::Announce => {
                    if self.reasoning_mode {
                        self.queue.push_back(Ok(emit::reasoning_mode_active()));
                    }
                    self.phase = Phase::Connect;
                }
                Phase::Connect => {
                    match self.producer.run(&self.query, &self.tools, true).await {
                        Ok(RunOutput::Streaming(chunks)) => {
                            self.phase = Phase::Streaming(chunks);
                        }
                        Ok(RunOutput::Complete(chunk)) => {
                            self.absorb_single(&chunk);
                            self.finish_completed();
                        }
                        Err(err) => self.finish_failed(err),
                    }
                }
                Phase::Streaming(mut chunks) => match chunks.next().await {
                    Some(Ok(chunk)) => {
                        self.absorb_chunk(&chunk);
                        self.phase = Phase::Streaming(chunks);
                    }
                    Some(Err(err)) => self.finish_failed(err),
                    None => self.finish_completed(),
                },
                Phase::Finished => return None,
            }
        }
    }

    fn finish_completed(&mut self) {
        info!(
            scope = %self.label,
            tools = self.totals.tools_used.len(),
            reasoning_chars = self.totals.reasoning_text.len(),
            "stream completed"
        );
        self.queue
            .push_back(Ok(emit::completion(&self.totals, self.label.mode_used())));
    }

    fn finish_failed(&mut self, err: crate::Error) {
        error!(scope = %self.label, error = %err, "stream failed");
        self.queue.push_back(Ok(emit::error(err.to_string())));
        self.queue.push_back(Err(err));
    }

    /// Process one streamed chunk: tool calls, then content, then the
    /// reasoning fields, forwarding events in that order.
    fn absorb_chunk(&mut self, chunk: &Chunk) {
        let view = normalize::fields(chunk);

        for raw in view.tool_calls {
            let record = tool_call::extract(raw);
            debug!(scope = %self.label, tool = %record.name, "using tool");
            if tool_call::is_reasoning_annotation(&record.name) {
                if let Some(sentence) = tool_call::reasoning_sentence(&record) {
                    self.queue.push_back(Ok(emit::reasoning_chunk(sentence)));
                }
            } else {
                self.queue
                    .push_back(Ok(emit::reasoning_chunk(tool_call::invocation_sentence(
                        &record,
                    ))));
            }
            self.totals.push_tool(record);
        }

        if let Some(content) = view.content {
            self.absorb_content(content);
        }

        if let Some(reasoning) = view.reasoning_content {
            self.totals.reasoning_text.push_str(reasoning);
            self.queue.push_back(Ok(emit::reasoning_chunk(reasoning)));
        }

        for step in view.reasoning_steps {
            let line = format!("🤔 推論ステップ: {}", step.text());
            self.totals.reasoning_text.push_str(&line);
            self.totals.reasoning_text.push('\n');
            self.queue.push_back(Ok(emit::reasoning_chunk(line)));
        }

        for message in view.reasoning_messages {
            let line = format!("💭 推論メッセージ: {}", message.text());
            self.totals.reasoning_text.push_str(&line);
            self.totals.reasoning_text.push('\n');
            self.queue.push_back(Ok(emit::reasoning_chunk(line)));
        }
    }

    /// Scrub tool-execution log lines out of the content and route the
    /// remainder to the reasoning or answer stream.
    fn absorb_content(&mut self, content: &str) {
        let scrubbed = classify::scrub_tool_logs(content);

        for fragment in &scrubbed.fragments {
            let line = format!("⚡ {}\n", fragment);
            self.totals.reasoning_text.push_str(&line);
            self.queue.push_back(Ok(emit::reasoning_chunk(line)));
        }

        let clean = scrubbed.clean.trim();
        if clean.is_empty() {
            return;
        }
        debug!(scope = %self.label, chunk = %preview(clean), "content chunk");

        match classify::classify(clean, self.reasoning_mode) {
            ContentClass::Reasoning => {
                self.totals.reasoning_text.push_str(clean);
                self.totals.reasoning_text.push('\n');
                self.queue.push_back(Ok(emit::reasoning_chunk(clean)));
            }
            ContentClass::Answer => {
                self.totals.answer_text.push_str(clean);
                self.queue.push_back(Ok(emit::answer_chunk(clean)));
            }
        }
    }

    /// Process the terminal chunk of a non-streaming run: tool calls are
    /// recorded and the full content goes out as one `content_chunk`.
    fn absorb_single(&mut self, chunk: &Chunk) {
        let view = normalize::fields(chunk);

        for raw in view.tool_calls {
            let record = tool_call::extract(raw);
            debug!(scope = %self.label, tool = %record.name, "using tool");
            self.totals.push_tool(record);
        }

        if let Some(content) = view.content {
            if !content.trim().is_empty() {
                self.totals.answer_text.push_str(content);
                self.queue.push_back(Ok(emit::content_chunk(content)));
            }
        }
    }
}

fn preview(text: &str) -> String {
    let flat: String = text.chars().take(PREVIEW_CHARS).collect();
    let flat = flat.replace('\n', " ");
    if text.chars().count() > PREVIEW_CHARS {
        format!("{}...", flat)
    } else {
        flat
    }
}
