//! Configuration loading and merging logic
//!
//! Precedence (highest to lowest): environment overrides, `config.yaml`,
//! built-in defaults.

use super::{paths, schema::Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    pub fn load() -> Result<Config> {
        let mut config = Self::load_defaults();

        let root = paths::root_config_path();
        if root.exists() {
            config = Self::load_file(&root)?;
        }

        Ok(Self::apply_overrides(config, |key| std::env::var(key).ok()))
    }

    /// Load configuration from a file. Missing keys take their defaults.
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if contents.trim().is_empty() {
            return Ok(Self::load_defaults());
        }

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Parse the settings file and check value ranges
    pub fn validate(path: &Path) -> Result<Config> {
        let config = if path.exists() {
            Self::load_file(path)?
        } else {
            Self::load_defaults()
        };

        if config.logger.buffer == 0 {
            return Err(anyhow::anyhow!("logger.buffer must be greater than 0"));
        }
        if config.logger.tail != "all" && config.logger.tail.parse::<u64>().is_err() {
            return Err(anyhow::anyhow!(
                "logger.tail must be a number or 'all', got '{}'",
                config.logger.tail
            ));
        }
        if config.timeouts.batch_secs == 0 || config.timeouts.recreate_secs == 0 {
            return Err(anyhow::anyhow!("timeouts must be greater than 0"));
        }

        Ok(config)
    }

    pub fn load_defaults() -> Config {
        Config::default()
    }

    /// Apply DOCKHAND_* overrides read through `lookup`
    pub fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
        if let Some(ms) = lookup("DOCKHAND_REFRESH_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            config.refresh_interval_ms = ms;
        }

        if let Some(tail) = lookup("DOCKHAND_LOG_TAIL") {
            config.logger.tail = tail;
        }

        if let Some(buffer) = lookup("DOCKHAND_LOG_BUFFER").and_then(|v| v.parse().ok()) {
            config.logger.buffer = buffer;
        }

        if let Some(mouse) = lookup("DOCKHAND_MOUSE").and_then(|v| v.parse().ok()) {
            config.ui.enable_mouse = mouse;
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.refresh_interval_ms, 2000);
        assert_eq!(config.logger.buffer, 1000);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("DOCKHAND_LOG_TAIL", "all"),
            ("DOCKHAND_LOG_BUFFER", "not-a-number"),
            ("DOCKHAND_REFRESH_INTERVAL_MS", "750"),
        ]
        .into_iter()
        .collect();

        let config = ConfigLoader::apply_overrides(Config::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.logger.tail, "all");
        assert_eq!(config.logger.buffer, 1000);
        assert_eq!(config.refresh_interval_ms, 750);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = Config {
            refresh_interval_ms: 5000,
            ..Default::default()
        };

        ConfigLoader::save(&config, &path).unwrap();
        assert_eq!(ConfigLoader::load_file(&path).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_bad_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "logger:\n  tail: lots\n").unwrap();

        let err = ConfigLoader::validate(&path).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"logger.tail must be a number or 'all', got 'lots'");
    }
}
