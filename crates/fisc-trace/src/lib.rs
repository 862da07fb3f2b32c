//! # fisc-trace
//!
//! Computation-tree handling for Fisc.
//!
//! A computation tree is the flat, indentation-encoded serialization of a nested
//! calculation: each line is `<variable> <vectorized values> ...` and its leading
//! whitespace run encodes its depth. Children of a line are the subsequent lines with
//! strictly greater depth, up to the next line at the same or lesser depth. Indentation
//! may skip levels; nesting is defined purely by relative depth.
//!
//! This crate provides:
//! - [`ComputationTree`]: the captured, storable record (identity, provenance, lines,
//!   entity description)
//! - [`extract`]: isolate the contiguous subtree for one target variable
//! - [`annotate`]: suffix each line with the entity group its variable belongs to
//! - [`CountryMetadata`]: the calculation-metadata slice those operations consume

pub mod annotate;
pub mod error;
pub mod extract;
pub mod metadata;
pub mod tree;

pub use annotate::annotate;
pub use error::TraceError;
pub use extract::{extract, indent_depth};
pub use metadata::{CountryMetadata, EntityMetadata, VariableMetadata};
pub use tree::ComputationTree;
