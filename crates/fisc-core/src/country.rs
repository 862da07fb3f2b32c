//! Country identity and engine package provenance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A supported country.
///
/// Every stored computation tree records which country engine produced it, so that
/// explanation-time metadata lookups can detect provenance skew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountryId {
    Uk,
    Us,
    Ca,
    Ng,
    Il,
}

impl CountryId {
    /// All supported countries, in registration order.
    pub const ALL: [Self; 5] = [Self::Uk, Self::Us, Self::Ca, Self::Ng, Self::Il];

    /// The lowercase wire form (`"uk"`, `"us"`, ...).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uk => "uk",
            Self::Us => "us",
            Self::Ca => "ca",
            Self::Ng => "ng",
            Self::Il => "il",
        }
    }

    /// Name of the country's calculation engine package.
    #[must_use]
    pub const fn package_name(self) -> &'static str {
        match self {
            Self::Uk => "policyengine_uk",
            Self::Us => "policyengine_us",
            Self::Ca => "policyengine_canada",
            Self::Ng => "policyengine_ng",
            Self::Il => "policyengine_il",
        }
    }

    /// Version of the country's calculation engine package.
    ///
    /// Resolved at engine-integration time; `"0.0.0"` when the engine is not
    /// linked into this build. Recorded as provenance on every stored tree.
    #[must_use]
    pub const fn package_version(self) -> &'static str {
        "0.0.0"
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountryId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uk" => Ok(Self::Uk),
            "us" => Ok(Self::Us),
            "ca" => Ok(Self::Ca),
            "ng" => Ok(Self::Ng),
            "il" => Ok(Self::Il),
            other => Err(CoreError::InvalidCountry(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_all_ids() {
        for country in CountryId::ALL {
            assert_eq!(country.as_str().parse::<CountryId>().unwrap(), country);
        }
    }

    #[rstest::rstest]
    #[case("de")]
    #[case("US")]
    #[case("")]
    fn rejects_unknown_id(#[case] raw: &str) {
        let err = raw.parse::<CountryId>().unwrap_err();
        assert_eq!(err.to_string(), format!("Invalid country id: {raw}"));
    }

    #[test]
    fn serde_uses_lowercase_form() {
        let json = serde_json::to_string(&CountryId::Us).unwrap();
        assert_eq!(json, "\"us\"");
        let back: CountryId = serde_json::from_str("\"uk\"").unwrap();
        assert_eq!(back, CountryId::Uk);
    }
}
