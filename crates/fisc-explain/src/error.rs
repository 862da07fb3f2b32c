//! Explanation error taxonomy.
//!
//! Every failure the orchestrator can surface, with a coarse [`ErrorKind`]
//! classification so a transport layer can choose a client (4xx) or server (5xx)
//! response without matching on individual variants.

use thiserror::Error;

use fisc_core::CoreError;
use fisc_store::StoreError;
use fisc_trace::TraceError;

/// Coarse classification of an [`ExplainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Feature disabled or credential missing; never retried.
    Unauthorized,
    /// Invalid request input (household shape, country, qualifying-variable count).
    Validation,
    /// The referenced tree record does not exist.
    NotFound,
    /// Version skew between the stored tree and current metadata.
    Provenance,
    /// Storage fault or text-generation failure; generic server-side error.
    Upstream,
}

/// Errors surfaced by the explanation pipeline.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// The AI feature is switched off.
    #[error("AI features are not enabled")]
    Disabled,

    /// The feature is on but no credential is configured.
    #[error("No text-generation credential is configured")]
    MissingCredential,

    /// No calculation metadata is registered for the requested country.
    #[error("No calculation metadata registered for country {country}")]
    MissingMetadata { country: String },

    /// Household validation failure (flattening, qualifying-variable count).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Tree annotation failure: stored tree and metadata disagree.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Tree storage failure, including the distinct not-found case.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The model replied without any text content.
    #[error("The model response contains no text content")]
    EmptyResponse,

    /// Text-generation call failure (network, upstream status, malformed payload).
    #[error("Error generating analysis: {0}")]
    Upstream(String),
}

impl ExplainError {
    /// Classify this error for boundary mapping.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Disabled | Self::MissingCredential => ErrorKind::Unauthorized,
            Self::MissingMetadata { .. } | Self::Core(_) => ErrorKind::Validation,
            Self::Store(StoreError::NotFound { .. }) => ErrorKind::NotFound,
            Self::Trace(_) => ErrorKind::Provenance,
            Self::Store(_) | Self::EmptyResponse | Self::Upstream(_) => ErrorKind::Upstream,
        }
    }
}
