//! Storage error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in the tree storage layer.
///
/// `NotFound` is distinct from every other fault: callers map it to a client-facing
/// "unknown record" response, while the rest are generic storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists under the requested id.
    #[error("Unable to find record with UUID {uuid}")]
    NotFound { uuid: Uuid },

    /// The stored payload could not be decoded (corrupt or schema-incompatible).
    #[error("Failed to decode stored record: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// Any other object-store fault.
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// I/O error (local filesystem backend setup).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
