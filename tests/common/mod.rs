//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use agent_relay::engine::{ChunkProducer, RunOutput};
use agent_relay::types::chunk::Chunk;
use agent_relay::types::tool::ToolSpec;
use agent_relay::{PipeResult, Result};

/// Producer replaying a scripted chunk sequence, recording the tool list it
/// was handed.
pub struct ScriptedProducer {
    items: Mutex<Option<Vec<PipeResult<Chunk>>>>,
    pub seen_tools: Mutex<Vec<Vec<String>>>,
}

impl ScriptedProducer {
    pub fn new(items: Vec<PipeResult<Chunk>>) -> Arc<Self> {
        Arc::new(Self {
            items: Mutex::new(Some(items)),
            seen_tools: Mutex::new(Vec::new()),
        })
    }

    pub fn tool_lists(&self) -> Vec<Vec<String>> {
        self.seen_tools.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChunkProducer for ScriptedProducer {
    async fn run(&self, _query: &str, tools: &[ToolSpec], _stream: bool) -> Result<RunOutput> {
        self.seen_tools
            .lock()
            .unwrap()
            .push(tools.iter().map(|t| t.name.clone()).collect());
        let items = self.items.lock().unwrap().take().unwrap_or_default();
        Ok(RunOutput::Streaming(Box::pin(futures::stream::iter(items))))
    }
}

/// Producer resolving to a single terminal chunk (non-streaming run).
pub struct SingleShotProducer {
    chunk: Mutex<Option<Chunk>>,
}

impl SingleShotProducer {
    pub fn new(chunk: Chunk) -> Arc<Self> {
        Arc::new(Self {
            chunk: Mutex::new(Some(chunk)),
        })
    }
}

#[async_trait::async_trait]
impl ChunkProducer for SingleShotProducer {
    async fn run(&self, _query: &str, _tools: &[ToolSpec], _stream: bool) -> Result<RunOutput> {
        let chunk = self.chunk.lock().unwrap().take().unwrap_or_default();
        Ok(RunOutput::Complete(chunk))
    }
}

pub fn content_chunk(text: &str) -> Chunk {
    Chunk {
        content: Some(text.to_string()),
        ..Default::default()
    }
}

pub fn tool_call_chunk(value: serde_json::Value) -> Chunk {
    Chunk {
        tool_calls: Some(vec![serde_json::from_value(value).unwrap()]),
        ..Default::default()
    }
}
