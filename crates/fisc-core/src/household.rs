//! Household model and variable flattening.
//!
//! A household is a nested record: entity group -> entity -> variable -> year -> value.
//! Flattening turns it into one [`FlattenedVariable`] per leaf so callers can filter
//! for the single variable whose value is unset (the one to be explained).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CoreError;

/// Variable names that mark entity-group structure rather than computed values.
/// These are skipped when flattening.
const VARIABLE_BLACKLIST: [&str; 1] = ["members"];

/// One variable entry inside an entity: either a structural role marker listing the
/// member people of a group entity, or a map of year -> value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableRecord {
    /// Role marker, e.g. `"members": ["you", "your partner"]`.
    Members(Vec<String>),
    /// Period-keyed values, e.g. `{"2024": 29000}`. A `null` value marks the
    /// variable the caller wants computed and explained.
    Periods(BTreeMap<String, Value>),
}

/// A nested household record as supplied by the caller.
///
/// Group, entity, and variable iteration order is deterministic (sorted) but carries
/// no semantic meaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Household(pub BTreeMap<String, BTreeMap<String, BTreeMap<String, VariableRecord>>>);

/// A single (entity group, entity, variable, year, value) leaf from a household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlattenedVariable {
    pub entity_group: String,
    pub entity: String,
    pub variable: String,
    pub year: i32,
    /// `Value::Null` exactly when the caller wants this variable computed.
    pub value: Value,
}

impl FlattenedVariable {
    /// Short descriptor for error messages: `group/entity/variable/year`.
    #[must_use]
    pub fn descriptor(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.entity_group, self.entity, self.variable, self.year
        )
    }
}

/// Equality filter on one field of a [`FlattenedVariable`].
///
/// `Value(Value::Null)` is the unset-value probe used to locate the variable to
/// explain.
#[derive(Debug, Clone)]
pub enum FlattenedVariableFilter {
    EntityGroup(String),
    Entity(String),
    Variable(String),
    Year(i32),
    Value(Value),
}

impl FlattenedVariableFilter {
    fn matches(&self, var: &FlattenedVariable) -> bool {
        match self {
            Self::EntityGroup(group) => var.entity_group == *group,
            Self::Entity(entity) => var.entity == *entity,
            Self::Variable(name) => var.variable == *name,
            Self::Year(year) => var.year == *year,
            Self::Value(value) => var.value == *value,
        }
    }
}

/// Flatten a household into one record per (group, entity, variable, year) leaf.
///
/// Structural role markers (`members`) are skipped. If `filter` is supplied, only
/// matching records are retained. If `max_allowed` is supplied and the filtered count
/// exceeds it, the call fails naming every over-limit record; zero matches is not an
/// error here (see [`single_unset_variable`] for the distinct zero-match failure).
///
/// # Errors
///
/// Returns [`CoreError::Validation`] if a year key is not an integer, and
/// [`CoreError::TooManyVariables`] when the filtered count exceeds `max_allowed`.
pub fn flatten(
    household: &Household,
    filter: Option<&FlattenedVariableFilter>,
    max_allowed: Option<usize>,
) -> Result<Vec<FlattenedVariable>, CoreError> {
    let mut flattened = Vec::new();

    for (entity_group, entities) in &household.0 {
        for (entity, variables) in entities {
            for (variable, record) in variables {
                if VARIABLE_BLACKLIST.contains(&variable.as_str()) {
                    continue;
                }
                let VariableRecord::Periods(periods) = record else {
                    continue;
                };
                for (year_key, value) in periods {
                    let year: i32 = year_key.parse().map_err(|_| {
                        CoreError::Validation(format!(
                            "invalid year '{year_key}' for variable '{variable}' on entity '{entity}'"
                        ))
                    })?;
                    flattened.push(FlattenedVariable {
                        entity_group: entity_group.clone(),
                        entity: entity.clone(),
                        variable: variable.clone(),
                        year,
                        value: value.clone(),
                    });
                }
            }
        }
    }

    if let Some(filter) = filter {
        flattened.retain(|var| filter.matches(var));
    }

    if let Some(max_allowed) = max_allowed {
        if flattened.len() > max_allowed {
            return Err(CoreError::TooManyVariables {
                max_allowed,
                matches: flattened.iter().map(FlattenedVariable::descriptor).collect(),
            });
        }
    }

    Ok(flattened)
}

/// Locate the single variable in the household whose value is unset (`null`).
///
/// # Errors
///
/// Returns [`CoreError::NoQualifyingVariable`] when no variable is unset and
/// [`CoreError::TooManyVariables`] when more than one is.
pub fn single_unset_variable(household: &Household) -> Result<FlattenedVariable, CoreError> {
    let filter = FlattenedVariableFilter::Value(Value::Null);
    let mut matches = flatten(household, Some(&filter), Some(1))?;
    matches.pop().ok_or(CoreError::NoQualifyingVariable)
}
