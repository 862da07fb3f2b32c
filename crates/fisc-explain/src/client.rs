//! Text-generation client: trait, Anthropic implementation, SSE decoding.

use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt, TryStreamExt};
use serde::Deserialize;

use fisc_config::AiConfig;

use crate::error::ExplainError;

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A text-generation service: one buffered call, one incremental call.
///
/// The orchestrator is generic over this so tests can substitute a scripted
/// generator and assert that gated requests never reach the network.
#[allow(async_fn_in_trait)]
pub trait TextGenerator {
    /// Incremental text fragments, in arrival order.
    type TokenStream: Stream<Item = Result<String, ExplainError>> + Send + Unpin;

    /// Issue one call and wait for the complete response text.
    async fn complete(&self, prompt: &str) -> Result<String, ExplainError>;

    /// Issue a streaming call yielding text fragments as they arrive.
    ///
    /// Dropping the returned stream must drop the upstream connection.
    async fn stream(&self, prompt: &str) -> Result<Self::TokenStream, ExplainError>;
}

/// Anthropic messages-API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    base_url: String,
}

impl AnthropicClient {
    /// Build a client from resolved AI configuration and the gate's credential.
    #[must_use]
    pub fn from_config(ai: &AiConfig, credential: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: credential.to_string(),
            model: ai.model.clone(),
            max_tokens: ai.max_tokens,
            temperature: ai.temperature,
            base_url: ANTHROPIC_BASE_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_body(&self, prompt: &str, stream: bool) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "system": crate::prompt::SYSTEM_PROMPT,
            "messages": [{"role": "user", "content": prompt}],
            "stream": stream,
        })
    }

    async fn post(
        &self,
        prompt: &str,
        stream: bool,
    ) -> Result<reqwest::Response, ExplainError> {
        self.http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(prompt, stream))
            .send()
            .await
            .map_err(|e| ExplainError::Upstream(format!("send: {e}")))?
            .error_for_status()
            .map_err(|e| ExplainError::Upstream(format!("status: {e}")))
    }
}

impl TextGenerator for AnthropicClient {
    type TokenStream = BoxStream<'static, Result<String, ExplainError>>;

    async fn complete(&self, prompt: &str) -> Result<String, ExplainError> {
        let response = self
            .post(prompt, false)
            .await?
            .json::<MessagesResponse>()
            .await
            .map_err(|e| ExplainError::Upstream(format!("parse: {e}")))?;
        message_text(response)
    }

    async fn stream(&self, prompt: &str) -> Result<Self::TokenStream, ExplainError> {
        let response = self.post(prompt, true).await?;
        let mut decoder = SseDecoder::default();
        let deltas = response
            .bytes_stream()
            .map_err(|e| ExplainError::Upstream(format!("stream read: {e}")))
            .map_ok(move |chunk| futures_util::stream::iter(decoder.push(&chunk).into_iter().map(Ok)))
            .try_flatten();
        Ok(deltas.boxed())
    }
}

/// A buffered messages-API response, reduced to what we consume.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Extract the first text block of a buffered response.
fn message_text(response: MessagesResponse) -> Result<String, ExplainError> {
    response
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .ok_or(ExplainError::EmptyResponse)
}

/// Incremental server-sent-events decoder for the messages streaming API.
///
/// Feeds arbitrary byte chunks (which may split lines or UTF-8 sequences) and yields
/// the text of each `content_block_delta` event. All other event types are ignored.
#[derive(Debug, Default)]
struct SseDecoder {
    buffer: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    delta: Option<StreamDelta>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    text: Option<String>,
}

impl SseDecoder {
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut texts = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end();
            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            let Ok(event) = serde_json::from_str::<StreamEvent>(data.trim_start()) else {
                continue;
            };
            if event.kind != "content_block_delta" {
                continue;
            }
            if let Some(text) = event.delta.and_then(|d| d.text) {
                if !text.is_empty() {
                    texts.push(text);
                }
            }
        }

        texts
    }
}
