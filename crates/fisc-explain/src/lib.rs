//! # fisc-explain
//!
//! AI explanation pipeline for stored computation trees.
//!
//! The [`Explainer`] orchestrates one request end to end: it checks the feature
//! gate, finds the household's single unset variable, fetches the stored tree,
//! extracts and annotates the relevant subtree, renders the prompt, and dispatches
//! to a [`TextGenerator`] in buffered or streaming mode. Streaming responses are
//! re-chunked into fixed-size newline-delimited `{"response": chunk}` frames.
//!
//! The concrete generator is [`AnthropicClient`]; the orchestrator is generic so
//! tests (and alternative providers) can supply their own.

pub mod chunk;
pub mod client;
pub mod error;
pub mod explainer;
pub mod prompt;

pub use chunk::{Chunker, frame_stream};
pub use client::{AnthropicClient, TextGenerator};
pub use error::{ErrorKind, ExplainError};
pub use explainer::{Analysis, ExplainRequest, Explainer};
pub use prompt::{SYSTEM_PROMPT, render_prompt};
