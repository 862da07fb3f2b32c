//! # fisc-core
//!
//! Core types shared across all Fisc crates:
//! - Country identity and engine package provenance
//! - Entity descriptions (entity group -> ordered entity names)
//! - Household model and variable flattening
//! - Boundary response envelopes
//! - Cross-cutting error types

pub mod country;
pub mod entities;
pub mod errors;
pub mod household;
pub mod responses;

pub use country::CountryId;
pub use entities::EntityDescription;
pub use errors::CoreError;
pub use household::{
    FlattenedVariable, FlattenedVariableFilter, Household, VariableRecord, flatten,
    single_unset_variable,
};
pub use responses::{AnalysisResponse, ErrorResponse};
