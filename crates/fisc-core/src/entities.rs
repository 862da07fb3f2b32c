//! Entity descriptions attached to stored computation trees.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Mapping from entity-group name to the ordered entity names within that group.
///
/// Both orders are meaningful. The order of names within a group is positional:
/// computation-tree lines carry vectorized values (one per entity), and position `i`
/// in a group's value vector corresponds to name `i` here. Group order is the
/// caller's insertion order, kept through JSON round trips so the description
/// renders into prompts exactly as supplied. E.g. `{"people": ["you", "your
/// partner"]}`. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityDescription(pub Vec<(String, Vec<String>)>);

impl EntityDescription {
    /// Entity names registered for a group, if any.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, names)| names.as_slice())
    }

    /// True when no groups are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for EntityDescription {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (group, names) in &self.0 {
            map.serialize_entry(group, names)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EntityDescription {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DescriptionVisitor;

        impl<'de> Visitor<'de> for DescriptionVisitor {
            type Value = EntityDescription;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of entity-group name to entity names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut groups = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((group, names)) = access.next_entry::<String, Vec<String>>()? {
                    groups.push((group, names));
                }
                Ok(EntityDescription(groups))
            }
        }

        deserializer.deserialize_map(DescriptionVisitor)
    }
}

impl<const N: usize> From<[(&str, Vec<&str>); N]> for EntityDescription {
    fn from(groups: [(&str, Vec<&str>); N]) -> Self {
        Self(
            groups
                .into_iter()
                .map(|(group, names)| {
                    (
                        group.to_string(),
                        names.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect(),
        )
    }
}
