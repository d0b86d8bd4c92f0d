//! `timewheel.toml` loading.
//!
//! ```toml
//! [engine]
//! trim_on_update = true
//!
//! [defaults]
//! category = "work"
//! color = "#2196F3"
//! policy = "merge_skip_conflicts"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use timewheel_engine::{ApplyPolicy, EngineConfig};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub engine: EngineConfig,
    pub defaults: Defaults,
}

/// Values used when the matching flag is omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub category: String,
    pub color: String,
    pub policy: ApplyPolicy,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            category: "custom".to_string(),
            color: "#4CAF50".to_string(),
            policy: ApplyPolicy::EmptyOnly,
        }
    }
}

impl CliConfig {
    /// Load from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: CliConfig =
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: CliConfig = toml::from_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert!(!config.engine.trim_on_update);
    }

    #[test]
    fn test_partial_tables() {
        let config: CliConfig = toml::from_str(
            r#"
            [engine]
            trim_on_update = true

            [defaults]
            policy = "replace"
            "#,
        )
        .unwrap();
        assert!(config.engine.trim_on_update);
        assert_eq!(config.defaults.policy, ApplyPolicy::Replace);
        assert_eq!(config.defaults.category, "custom");
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<CliConfig>("[defaults]\ncolour = \"red\"").is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = CliConfig::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading config"), "got: {err}");
    }
}
