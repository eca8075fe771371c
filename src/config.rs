//! Engine configuration and environment variable handling.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;

use crate::catalog::query::CatalogChoice;

/// Tuning knobs for the search pipeline, loadable from a TOML file or from
/// environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Deadline for each catalog query, in seconds
    #[serde(default = "default_catalog_deadline_secs")]
    pub catalog_deadline_secs: u64,
    /// Combinations evaluated between cancellation polls during analysis
    #[serde(default = "default_cancel_poll_interval")]
    pub cancel_poll_interval: usize,
    /// Catalog used when the caller does not choose one
    #[serde(default)]
    pub default_catalog: CatalogChoice,
}

fn default_catalog_deadline_secs() -> u64 {
    30
}

fn default_cancel_poll_interval() -> usize {
    100
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog_deadline_secs: default_catalog_deadline_secs(),
            cancel_poll_interval: default_cancel_poll_interval(),
            default_catalog: CatalogChoice::default(),
        }
    }
}

impl EngineConfig {
    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `AGS_CATALOG_DEADLINE_SECS` (optional, default: 30)
    /// - `AGS_CANCEL_POLL_INTERVAL` (optional, default: 100)
    /// - `AGS_DEFAULT_CATALOG` (optional): `ppmxl` | `ucac3` | `nomad1` | `user_catalog`
    ///
    /// # Errors
    /// Returns an error if a variable is set but not parseable.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        if let Ok(value) = env::var("AGS_CATALOG_DEADLINE_SECS") {
            config.catalog_deadline_secs = value
                .parse()
                .map_err(|_| "AGS_CATALOG_DEADLINE_SECS must be a number of seconds".to_string())?;
        }
        if let Ok(value) = env::var("AGS_CANCEL_POLL_INTERVAL") {
            config.cancel_poll_interval = value
                .parse()
                .map_err(|_| "AGS_CANCEL_POLL_INTERVAL must be a positive integer".to_string())?;
        }
        if let Ok(value) = env::var("AGS_DEFAULT_CATALOG") {
            config.default_catalog = serde_json::from_value(serde_json::Value::String(value))
                .map_err(|_| "AGS_DEFAULT_CATALOG is not a known catalog".to_string())?;
        }

        Ok(config)
    }

    /// Read a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Catalog deadline as a [`Duration`].
    pub fn catalog_deadline(&self) -> Duration {
        Duration::from_secs(self.catalog_deadline_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.catalog_deadline_secs, 30);
        assert_eq!(config.cancel_poll_interval, 100);
        assert_eq!(config.default_catalog, CatalogChoice::Ucac3);
    }

    #[test]
    fn test_toml_partial_overrides_keep_defaults() {
        let config: EngineConfig = toml::from_str("catalog_deadline_secs = 5").unwrap();
        assert_eq!(config.catalog_deadline_secs, 5);
        assert_eq!(config.cancel_poll_interval, 100);
    }
}
