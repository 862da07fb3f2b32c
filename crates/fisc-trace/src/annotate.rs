//! Entity-group annotation of extracted tree segments.
//!
//! Computation trees carry vectorized values with no entity names: a person-level
//! variable in a household of four shows four values. Annotation suffixes each line
//! with the plural group name of the variable's entity type, so a reader (or the
//! explainer prompt) can align positions against the stored entity description.

use crate::error::TraceError;
use crate::metadata::CountryMetadata;

/// Parse the leading variable token of a line: characters after the indentation, up
/// to but not including the first whitespace or `<`. The token must look like an
/// identifier (ASCII letter, then letters, digits, or underscores).
fn variable_token(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let end = trimmed
        .find(|c: char| c.is_whitespace() || c == '<')
        .unwrap_or(trimmed.len());
    let token = &trimmed[..end];
    is_identifier(token).then_some(token)
}

fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Suffix each line of a tree segment with ` entity_group: {plural}`.
///
/// The whole call aborts on the first malformed line: partial annotation would hide
/// a version skew between the stored tree and the metadata used to explain it.
///
/// # Errors
///
/// Returns [`TraceError::UnparseableLine`] when a line has no identifier token,
/// [`TraceError::UnknownVariable`] when the variable is absent from metadata,
/// [`TraceError::MissingEntity`] when it has no entity association, and
/// [`TraceError::UnknownEntity`] when its entity type has no metadata entry.
pub fn annotate(segment: &[String], metadata: &CountryMetadata) -> Result<Vec<String>, TraceError> {
    segment
        .iter()
        .map(|line| {
            let name = variable_token(line).ok_or_else(|| TraceError::UnparseableLine {
                line: line.clone(),
            })?;
            let variable =
                metadata
                    .variables
                    .get(name)
                    .ok_or_else(|| TraceError::UnknownVariable {
                        variable: name.to_string(),
                    })?;
            let entity = variable
                .entity
                .as_deref()
                .ok_or_else(|| TraceError::MissingEntity {
                    variable: name.to_string(),
                })?;
            let group = metadata
                .entities
                .get(entity)
                .ok_or_else(|| TraceError::UnknownEntity {
                    variable: name.to_string(),
                    entity: entity.to_string(),
                })?;
            Ok(format!("{line} entity_group: {}", group.plural))
        })
        .collect()
}
