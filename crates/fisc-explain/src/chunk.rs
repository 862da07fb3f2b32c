//! Fixed-size chunk framing for streamed responses.
//!
//! Upstream text fragments arrive with arbitrary boundaries; the boundary contract
//! is fixed-size frames (`{"response": chunk}` per line). The framer buffers only
//! enough to fill one chunk, so backpressure flows from the consumer's read rate.

use std::collections::VecDeque;

use futures_util::{Stream, StreamExt, stream};

use fisc_core::AnalysisResponse;

use crate::error::ExplainError;

/// Re-chunks incoming text fragments into fixed-size pieces (measured in
/// characters, so multibyte text is never split mid-character).
#[derive(Debug)]
pub struct Chunker {
    size: usize,
    buffer: String,
}

impl Chunker {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size: size.max(1),
            buffer: String::new(),
        }
    }

    /// Absorb a fragment and return every complete chunk now available.
    pub fn push(&mut self, fragment: &str) -> Vec<String> {
        self.buffer.push_str(fragment);
        let mut chunks = Vec::new();

        loop {
            let mut indices = self.buffer.char_indices();
            if indices.nth(self.size - 1).is_none() {
                break; // fewer than `size` chars buffered
            }
            let split = indices.next().map_or(self.buffer.len(), |(i, _)| i);
            chunks.push(self.buffer[..split].to_string());
            self.buffer.drain(..split);
        }

        chunks
    }

    /// Drain the remainder shorter than one chunk, if any.
    pub fn flush(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

fn frame_line(chunk: String) -> Result<String, ExplainError> {
    let frame = serde_json::to_string(&AnalysisResponse::new(chunk))
        .map_err(|e| ExplainError::Upstream(format!("encode frame: {e}")))?;
    Ok(format!("{frame}\n"))
}

struct FrameState<S> {
    source: S,
    chunker: Chunker,
    ready: VecDeque<String>,
    source_done: bool,
}

/// Adapt a fragment stream into newline-delimited `{"response": chunk}` frames of
/// `chunk_size` characters, flushing the remainder as a final short frame.
///
/// Errors from the source terminate the frame sequence; dropping the returned
/// stream drops the source (and with it any upstream connection).
pub fn frame_stream<S>(
    source: S,
    chunk_size: usize,
) -> impl Stream<Item = Result<String, ExplainError>> + Send
where
    S: Stream<Item = Result<String, ExplainError>> + Send + Unpin + 'static,
{
    let state = FrameState {
        source,
        chunker: Chunker::new(chunk_size),
        ready: VecDeque::new(),
        source_done: false,
    };

    stream::try_unfold(state, |mut state| async move {
        loop {
            if let Some(chunk) = state.ready.pop_front() {
                return Ok(Some((frame_line(chunk)?, state)));
            }
            if state.source_done {
                return Ok(None);
            }
            match state.source.next().await {
                Some(Ok(fragment)) => state.ready.extend(state.chunker.push(&fragment)),
                Some(Err(error)) => return Err(error),
                None => {
                    state.source_done = true;
                    state.ready.extend(state.chunker.flush());
                }
            }
        }
    })
}
