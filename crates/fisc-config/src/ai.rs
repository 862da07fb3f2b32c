//! AI (explanation) configuration and the resolved feature gate.

use serde::{Deserialize, Serialize};

/// Environment variable consulted when no `ai.api_key` is configured. Kept for
/// backward compatibility with deployments that only export the vendor variable.
pub const CREDENTIAL_ENV_VAR: &str = "ANTHROPIC_API_KEY";

fn default_model() -> String {
    String::from("claude-3-5-sonnet-20240620")
}

const fn default_max_tokens() -> u32 {
    1500
}

const fn default_chunk_size() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AiConfig {
    /// Explicit enablement flag. `None` means "enable when a credential is present";
    /// an explicit `false` always wins, even with a credential configured.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Text-generation service credential. Empty means absent.
    #[serde(default)]
    pub api_key: String,

    /// Model identifier passed on every call.
    #[serde(default = "default_model")]
    pub model: String,

    /// Response token cap.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature (0.0 = deterministic).
    #[serde(default)]
    pub temperature: f32,

    /// Streaming frame size in characters.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            api_key: String::new(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            chunk_size: default_chunk_size(),
        }
    }
}

impl AiConfig {
    /// Fill an empty `api_key` from the vendor environment variable, if set.
    /// Called once at load time so the gate never re-reads the environment.
    pub fn adopt_env_credential(&mut self) {
        if self.api_key.is_empty() {
            if let Ok(key) = std::env::var(CREDENTIAL_ENV_VAR) {
                if !key.is_empty() {
                    self.api_key = key;
                }
            }
        }
    }
}

/// The AI feature gate, resolved once at startup and injected as a dependency.
///
/// Both conditions are required for availability: the feature must be enabled and a
/// credential must be present. With no explicit `enabled` flag, a present credential
/// auto-enables the feature; an explicit `enabled = false` always wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureState {
    pub enabled: bool,
    pub credential: Option<String>,
}

impl FeatureState {
    /// Resolve the gate from configuration. Pure: reads nothing but `ai`.
    #[must_use]
    pub fn resolve(ai: &AiConfig) -> Self {
        let credential = if ai.api_key.is_empty() {
            None
        } else {
            Some(ai.api_key.clone())
        };
        let enabled = ai.enabled.unwrap_or(credential.is_some());
        Self {
            enabled,
            credential,
        }
    }

    /// A gate that is always closed.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            credential: None,
        }
    }

    /// True when an explanation request may proceed to the upstream call.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.enabled && self.credential.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn config(enabled: Option<bool>, api_key: &str) -> AiConfig {
        AiConfig {
            enabled,
            api_key: api_key.to_string(),
            ..AiConfig::default()
        }
    }

    #[rstest]
    // explicit enable still needs a credential
    #[case(Some(true), "", false)]
    #[case(Some(true), "sk-test", true)]
    // explicit disable wins over a present credential
    #[case(Some(false), "", false)]
    #[case(Some(false), "sk-test", false)]
    // unset flag: credential presence decides
    #[case(None, "", false)]
    #[case(None, "sk-test", true)]
    fn gate_truth_table(
        #[case] enabled: Option<bool>,
        #[case] api_key: &str,
        #[case] available: bool,
    ) {
        let state = FeatureState::resolve(&config(enabled, api_key));
        assert_eq!(state.is_available(), available);
    }

    #[test]
    fn resolve_carries_credential() {
        let state = FeatureState::resolve(&config(None, "sk-test"));
        assert_eq!(state.credential.as_deref(), Some("sk-test"));
    }

    #[test]
    fn disabled_gate_is_closed() {
        assert!(!FeatureState::disabled().is_available());
    }

    #[test]
    fn defaults_match_call_parameters() {
        let ai = AiConfig::default();
        assert_eq!(ai.model, "claude-3-5-sonnet-20240620");
        assert_eq!(ai.max_tokens, 1500);
        assert_eq!(ai.temperature, 0.0);
        assert_eq!(ai.chunk_size, 5);
        assert_eq!(ai.enabled, None);
    }
}
