//! Trace error types.

use thiserror::Error;

/// Errors raised while parsing or annotating computation-tree lines.
///
/// Any of these during annotation indicates provenance skew between the stored tree
/// and the metadata version used to explain it, so annotation aborts with no partial
/// output.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A line does not start with a parseable variable token.
    #[error("Could not parse variable name from line: {line}")]
    UnparseableLine { line: String },

    /// A tree variable is absent from the current calculation metadata.
    #[error("Variable {variable} from computation tree not found in metadata")]
    UnknownVariable { variable: String },

    /// A tree variable has no associated entity type in metadata.
    #[error("Variable {variable} from computation tree has no entity information")]
    MissingEntity { variable: String },

    /// A variable's entity type has no entry in the entity metadata.
    #[error("Entity {entity} for variable {variable} not found in metadata")]
    UnknownEntity { variable: String, entity: String },
}
