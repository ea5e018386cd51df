//! Configuration loading
//!
//! Sources are merged in this order (later sources override earlier):
//! 1. Default values from `BoardConfig::default()`
//! 2. TOML configuration file (if present)
//! 3. Environment variables prefixed `IDEABOARD_`, with `__` separating
//!    nested keys (e.g. `IDEABOARD_CACHE__ENABLED`)

use crate::domain::error::{Error, Result};
use crate::infrastructure::cache::CacheConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name looked up in the working directory
pub const DEFAULT_CONFIG_FILENAME: &str = "ideaboard.toml";

/// Environment variable prefix
pub const CONFIG_ENV_PREFIX: &str = "IDEABOARD";

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Cache policy per partition
    pub cache: CacheConfig,
}

impl BoardConfig {
    /// Validate all sections
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()
    }
}

/// Configuration loader service
#[derive(Clone, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Load configuration from all sources
    pub fn load(&self) -> Result<BoardConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(BoardConfig::default()));

        match &self.config_path {
            Some(path) => {
                if path.exists() {
                    figment = figment.merge(Toml::file(path));
                    tracing::info!(path = %path.display(), "configuration file loaded");
                } else {
                    tracing::warn!(path = %path.display(), "configuration file not found, using defaults");
                }
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    figment = figment.merge(Toml::file(default_path));
                    tracing::info!(path = %default_path.display(), "configuration file loaded");
                }
            }
        }

        let prefix = self.env_prefix.as_deref().unwrap_or(CONFIG_ENV_PREFIX);
        figment = figment.merge(Env::prefixed(&format!("{prefix}_")).split("__"));

        let config: BoardConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &BoardConfig, path: P) -> Result<()> {
        let rendered = toml::to_string_pretty(config)
            .map_err(|e| Error::config(format!("failed to serialize config to TOML: {e}")))?;
        std::fs::write(path.as_ref(), rendered)
            .map_err(|e| Error::config(format!("failed to write config file: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let config = BoardConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.cache.enabled);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ConfigLoader::new()
            .with_config_path("/nonexistent/ideaboard.toml")
            .with_env_prefix("IDEABOARD_TEST_UNSET")
            .load()
            .unwrap();
        assert_eq!(config.cache.partitions.ideas.ttl_secs, 3600);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut config = BoardConfig::default();
        config.cache.partitions.votes.max_entries = 123;

        let dir = std::env::temp_dir().join("ideaboard-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ideaboard.toml");

        let loader = ConfigLoader::new()
            .with_config_path(&path)
            .with_env_prefix("IDEABOARD_TEST_UNSET");
        loader.save_to_file(&config, &path).unwrap();
        let loaded = loader.load().unwrap();
        assert_eq!(loaded.cache.partitions.votes.max_entries, 123);

        std::fs::remove_file(&path).ok();
    }
}
