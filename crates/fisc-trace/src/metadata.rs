//! Country calculation metadata consumed by annotation.
//!
//! This is the slice of engine metadata the explainer needs: per-variable entity
//! association and per-entity-type plural group names. It is handed in already
//! validated; this crate never fetches or refreshes it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata for one calculation variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableMetadata {
    /// Entity type this variable is defined on (e.g. `"person"`, `"tax_unit"`).
    #[serde(default)]
    pub entity: Option<String>,

    /// Whether the variable is a direct input rather than a computed value.
    #[serde(default)]
    pub is_input: bool,

    /// Engine default when the variable is not supplied.
    #[serde(default)]
    pub default_value: Option<Value>,

    /// Period the variable is defined for (e.g. `"year"`, `"month"`).
    #[serde(default)]
    pub definition_period: Option<String>,
}

/// Metadata for one entity type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    /// Plural group name (e.g. `"people"`, `"tax_units"`). Entity descriptions and
    /// annotated tree lines use this form.
    pub plural: String,

    /// Human-readable label, when the engine provides one.
    #[serde(default)]
    pub label: Option<String>,
}

/// Calculation metadata for one country engine version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryMetadata {
    #[serde(default)]
    pub variables: HashMap<String, VariableMetadata>,
    #[serde(default)]
    pub entities: HashMap<String, EntityMetadata>,
}

impl CountryMetadata {
    /// Register a variable -> entity-type association. Test/builder convenience.
    #[must_use]
    pub fn with_variable(mut self, name: &str, entity: &str) -> Self {
        self.variables.insert(
            name.to_string(),
            VariableMetadata {
                entity: Some(entity.to_string()),
                ..VariableMetadata::default()
            },
        );
        self
    }

    /// Register an entity type -> plural group name. Test/builder convenience.
    #[must_use]
    pub fn with_entity(mut self, name: &str, plural: &str) -> Self {
        self.entities.insert(
            name.to_string(),
            EntityMetadata {
                plural: plural.to_string(),
                label: None,
            },
        );
        self
    }
}
