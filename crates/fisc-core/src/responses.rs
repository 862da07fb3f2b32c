//! Boundary response envelopes.
//!
//! These are the transport-independent payload shapes the explainer returns to its
//! caller: a single `{"response": ...}` object for buffered analysis (and for each
//! streamed frame), and a `{"status": "error", "message": ...}` envelope for failures.

use serde::{Deserialize, Serialize};

/// Successful analysis payload. Also the shape of each streamed frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub response: String,
}

impl AnalysisResponse {
    #[must_use]
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

/// Error envelope returned for any failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}
