//! Cross-cutting error types for Fisc.
//!
//! Domain-specific errors (`TraceError`, `StoreError`, `ExplainError`) live in their
//! respective crates. `CoreError` covers input validation shared across them.

use thiserror::Error;

/// Errors raised by core validation and household flattening.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The country id is not one of the supported countries.
    #[error("Invalid country id: {0}")]
    InvalidCountry(String),

    /// Data failed validation (shape, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Flattening produced more qualifying variables than the caller allows.
    #[error("More than {max_allowed} variable(s) was/were provided: {}", matches.join(", "))]
    TooManyVariables {
        /// The configured limit.
        max_allowed: usize,
        /// Descriptors of every over-limit match, as `group/entity/variable/year`.
        matches: Vec<String>,
    },

    /// No variable in the household qualifies for explanation.
    #[error("Household must include at least one variable set to null")]
    NoQualifyingVariable,
}
