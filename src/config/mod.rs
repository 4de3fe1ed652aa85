//! Configuration for dockhand
//!
//! Settings live in `config.yaml` inside the config directory, next to the
//! persisted groups.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, LoggerConfig, TimeoutConfig, UiConfig};

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "refreshIntervalMs" => Ok(config.refresh_interval_ms.to_string()),
        "statusTimeoutSecs" => Ok(config.status_timeout_secs.to_string()),
        "errorTimeoutSecs" => Ok(config.error_timeout_secs.to_string()),
        "timeouts.listSecs" => Ok(config.timeouts.list_secs.to_string()),
        "timeouts.operationSecs" => Ok(config.timeouts.operation_secs.to_string()),
        "timeouts.removeSecs" => Ok(config.timeouts.remove_secs.to_string()),
        "timeouts.batchSecs" => Ok(config.timeouts.batch_secs.to_string()),
        "timeouts.recreateSecs" => Ok(config.timeouts.recreate_secs.to_string()),
        "timeouts.pullSecs" => Ok(config.timeouts.pull_secs.to_string()),
        "timeouts.stopGraceSecs" => Ok(config.timeouts.stop_grace_secs.to_string()),
        "logger.tail" => Ok(config.logger.tail.clone()),
        "logger.buffer" => Ok(config.logger.buffer.to_string()),
        "logger.follow" => Ok(config.logger.follow.to_string()),
        "logger.timestamps" => Ok(config.logger.timestamps.to_string()),
        "ui.enableMouse" => Ok(config.ui.enable_mouse.to_string()),
        "ui.statsHistory" => Ok(config.ui.stats_history.to_string()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    fn number(value: &str, key: &str) -> anyhow::Result<u64> {
        value
            .parse()
            .with_context(|| format!("{} must be a number", key))
    }

    match key {
        "refreshIntervalMs" => config.refresh_interval_ms = number(value, key)?,
        "statusTimeoutSecs" => config.status_timeout_secs = number(value, key)?,
        "errorTimeoutSecs" => config.error_timeout_secs = number(value, key)?,
        "timeouts.listSecs" => config.timeouts.list_secs = number(value, key)?,
        "timeouts.operationSecs" => config.timeouts.operation_secs = number(value, key)?,
        "timeouts.removeSecs" => config.timeouts.remove_secs = number(value, key)?,
        "timeouts.batchSecs" => config.timeouts.batch_secs = number(value, key)?,
        "timeouts.recreateSecs" => config.timeouts.recreate_secs = number(value, key)?,
        "timeouts.pullSecs" => config.timeouts.pull_secs = number(value, key)?,
        "timeouts.stopGraceSecs" => config.timeouts.stop_grace_secs = number(value, key)?,
        "logger.tail" => config.logger.tail = value.to_string(),
        "logger.buffer" => {
            config.logger.buffer = value.parse().context("logger.buffer must be a number")?;
        }
        "logger.follow" => {
            config.logger.follow = value
                .parse()
                .context("logger.follow must be 'true' or 'false'")?;
        }
        "logger.timestamps" => {
            config.logger.timestamps = value
                .parse()
                .context("logger.timestamps must be 'true' or 'false'")?;
        }
        "ui.enableMouse" => {
            config.ui.enable_mouse = value
                .parse()
                .context("ui.enableMouse must be 'true' or 'false'")?;
        }
        "ui.statsHistory" => {
            config.ui.stats_history = value
                .parse()
                .context("ui.statsHistory must be a number")?;
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
