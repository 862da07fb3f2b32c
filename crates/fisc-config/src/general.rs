//! General application configuration.

use serde::{Deserialize, Serialize};

fn default_country() -> String {
    String::from("us")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Default country id for CLI commands that don't pass one explicitly.
    #[serde(default = "default_country")]
    pub default_country: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_country: default_country(),
        }
    }
}
