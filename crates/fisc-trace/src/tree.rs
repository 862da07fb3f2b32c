//! The captured computation-tree record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fisc_core::{CountryId, EntityDescription};

/// A captured computation tree: the immutable record persisted to object storage.
///
/// Created once per traced calculation, keyed by its `uuid`, fetched read-only at
/// explanation time. Never mutated in place; a re-run stores a fresh record under a
/// new id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputationTree {
    /// Storage key and client-facing identifier.
    pub uuid: Uuid,

    /// Country whose engine produced the trace.
    pub country: CountryId,

    /// Engine package version at capture time (provenance).
    pub package_version: String,

    /// The indentation-encoded trace lines, in calculation order.
    pub lines: Vec<String>,

    /// Entity groups and their ordered entity names at capture time.
    pub entity_description: EntityDescription,

    /// Capture timestamp.
    pub created_at: DateTime<Utc>,
}

impl ComputationTree {
    /// Capture a freshly traced calculation: assigns a new v4 uuid, stamps the
    /// country's engine package version and the current time.
    #[must_use]
    pub fn capture(
        country: CountryId,
        lines: Vec<String>,
        entity_description: EntityDescription,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            country,
            package_version: country.package_version().to_string(),
            lines,
            entity_description,
            created_at: Utc::now(),
        }
    }
}
