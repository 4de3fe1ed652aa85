//! `dockhand config ...` handlers

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::{self, ConfigLoader, paths};

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a configuration value, or print everything
    Get {
        /// Configuration key (e.g., "refreshIntervalMs", "logger.tail")
        key: Option<String>,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "refreshIntervalMs", "logger.tail")
        key: String,
        /// Configuration value
        value: String,
    },
    /// Print the merged configuration
    Show,
    /// Show configuration and groups file paths
    Path,
    /// Validate configuration
    Validate,
}

/// Handle configuration subcommands
pub fn handle_config_command(cmd: ConfigSubcommand) -> Result<()> {
    match cmd {
        ConfigSubcommand::Get { key } => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;
            match key {
                Some(key) => println!("{}", config::get_config_value(&config, &key)?),
                None => print!(
                    "{}",
                    serde_yaml::to_string(&config).context("Failed to serialize configuration")?
                ),
            }
        }
        ConfigSubcommand::Set { key, value } => {
            let path = paths::root_config_path();
            let mut config = if path.exists() {
                ConfigLoader::load_file(&path)?
            } else {
                ConfigLoader::load_defaults()
            };

            config::set_config_value(&mut config, &key, &value)
                .with_context(|| format!("Failed to set {} = {}", key, value))?;

            ConfigLoader::save_root(&config).context("Failed to save configuration")?;
            println!("Configuration saved");
        }
        ConfigSubcommand::Show => {
            let config = ConfigLoader::load().context("Failed to load configuration")?;
            let yaml =
                serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
            print!("{}", yaml);
        }
        ConfigSubcommand::Path => {
            println!("config: {}", paths::root_config_path().display());
            println!("groups: {}", paths::groups_path().display());
        }
        ConfigSubcommand::Validate => {
            let path = paths::root_config_path();
            ConfigLoader::validate(&path)
                .with_context(|| format!("Configuration validation failed: {}", path.display()))?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}
