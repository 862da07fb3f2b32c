//! # fisc-config
//!
//! Layered configuration loading for Fisc using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`FISC_*` prefix, `__` as separator)
//! 2. Project-level `.fisc/config.toml`
//! 3. User-level `~/.config/fisc/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `FISC_AI__API_KEY` -> `ai.api_key`, `FISC_STORAGE__BUCKET` ->
//! `storage.bucket`, etc. The `__` (double underscore) separates nested sections.
//! As a backward-compatibility special case, `ANTHROPIC_API_KEY` fills `ai.api_key`
//! when no key is configured through the layers above.
//!
//! # Usage
//!
//! ```no_run
//! use fisc_config::{FeatureState, FiscConfig};
//!
//! let config = FiscConfig::load_with_dotenv().expect("config");
//! let gate = FeatureState::resolve(&config.ai);
//! if gate.is_available() {
//!     println!("explanations enabled with model {}", config.ai.model);
//! }
//! ```

mod ai;
mod error;
mod general;
mod storage;

pub use ai::{AiConfig, CREDENTIAL_ENV_VAR, FeatureState};
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use storage::StorageConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FiscConfig {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl FiscConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env`
    /// file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when extraction fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config: Self = Self::figment().extract().map_err(ConfigError::from)?;
        config.ai.adopt_env_credential();
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Loads the workspace `.env` before building the figment. This is the typical
    /// entry point for the CLI and tests.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] when extraction fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".fisc/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("FISC_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("fisc").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or the current directory
    /// looking for a `.env` file. Silently does nothing if none is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_loads() {
        let config = FiscConfig::default();
        assert!(FeatureState::resolve(&config.ai) == FeatureState::disabled());
        assert!(!config.storage.is_s3_configured());
        assert_eq!(config.general.default_country, "us");
    }

    #[test]
    fn env_overrides_reach_nested_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("FISC_AI__ENABLED", "true");
            jail.set_env("FISC_AI__API_KEY", "sk-jail");
            jail.set_env("FISC_STORAGE__BUCKET", "trees-test");
            let config: FiscConfig = FiscConfig::figment().extract()?;
            assert_eq!(config.ai.enabled, Some(true));
            assert_eq!(config.ai.api_key, "sk-jail");
            assert_eq!(config.storage.bucket, "trees-test");
            Ok(())
        });
    }

    #[test]
    fn toml_layer_is_overridden_by_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir(".fisc")?;
            jail.create_file(
                ".fisc/config.toml",
                r#"
                    [ai]
                    model = "claude-3-haiku-20240307"
                    chunk_size = 8
                "#,
            )?;
            jail.set_env("FISC_AI__CHUNK_SIZE", "3");
            let config: FiscConfig = FiscConfig::figment().extract()?;
            assert_eq!(config.ai.model, "claude-3-haiku-20240307");
            assert_eq!(config.ai.chunk_size, 3);
            Ok(())
        });
    }
}
