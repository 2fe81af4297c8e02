//! Upstream HTTP chunk producer.
//!
//! Speaks to the execution engine as an opaque HTTP service: one POST per
//! run carrying `{query, tools, stream}`, the response body either a single
//! chunk object or newline-delimited chunk JSON decoded incrementally.

use bytes::Bytes;
use futures::{stream, Stream, StreamExt};
use serde::Serialize;
use url::Url;

use crate::engine::{ChunkProducer, RunOutput};
use crate::types::chunk::Chunk;
use crate::types::tool::ToolSpec;
use crate::{BoxStream, Error, Result};

/// End-of-stream sentinel some engines append after the last chunk line.
const DONE_SIGNAL: &str = "[DONE]";

#[derive(Serialize)]
struct RunRequest<'a> {
    query: &'a str,
    tools: Vec<&'a str>,
    stream: bool,
}

/// Chunk producer backed by one upstream engine endpoint.
pub struct UpstreamProducer {
    client: reqwest::Client,
    endpoint: Url,
}

impl UpstreamProducer {
    pub fn new(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChunkProducer for UpstreamProducer {
    async fn run(&self, query: &str, tools: &[ToolSpec], stream: bool) -> Result<RunOutput> {
        let body = RunRequest {
            query,
            tools: tools.iter().map(|t| t.name.as_str()).collect(),
            stream,
        };
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        if stream {
            Ok(RunOutput::Streaming(decode_chunk_lines(
                response.bytes_stream(),
            )))
        } else {
            let chunk = response.json::<Chunk>().await?;
            Ok(RunOutput::Complete(chunk))
        }
    }
}

/// Decode a newline-delimited chunk body incrementally.
///
/// Buffers bytes until a full line is available, tolerates `data:` framing,
/// and stops at the done signal.
pub fn decode_chunk_lines<S>(input: S) -> BoxStream<'static, Chunk>
where
    S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
{
    let stream = stream::unfold(
        (Box::pin(input), String::new()),
        |(mut input, mut buf)| async move {
            loop {
                if let Some(idx) = buf.find('\n') {
                    let line = buf[..idx].trim().to_string();
                    buf = buf[idx + 1..].to_string();
                    if line.is_empty() {
                        continue;
                    }
                    match parse_chunk_line(&line) {
                        LineOutcome::Chunk(result) => return Some((result, (input, buf))),
                        LineOutcome::Done => return None,
                    }
                }

                match input.next().await {
                    Some(Ok(bytes)) => {
                        buf.push_str(&String::from_utf8_lossy(&bytes));
                        continue;
                    }
                    Some(Err(err)) => {
                        return Some((Err(Error::Transport(err)), (input, buf)));
                    }
                    None => {
                        // EOF: parse whatever remains in the buffer once.
                        let line = buf.trim().to_string();
                        buf = String::new();
                        if line.is_empty() {
                            return None;
                        }
                        match parse_chunk_line(&line) {
                            LineOutcome::Chunk(result) => return Some((result, (input, buf))),
                            LineOutcome::Done => return None,
                        }
                    }
                }
            }
        },
    );

    Box::pin(stream)
}

enum LineOutcome {
    Chunk(crate::PipeResult<Chunk>),
    Done,
}

fn parse_chunk_line(line: &str) -> LineOutcome {
    let payload = line
        .strip_prefix("data:")
        .map(str::trim_start)
        .unwrap_or(line);
    if payload == DONE_SIGNAL {
        return LineOutcome::Done;
    }
    match serde_json::from_str::<Chunk>(payload) {
        Ok(chunk) => LineOutcome::Chunk(Ok(chunk)),
        Err(err) => LineOutcome::Chunk(Err(Error::Serialization(err))),
    }
}
