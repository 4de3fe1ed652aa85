//! Configuration schema definitions
//!
//! Defines the structure of `config.yaml`. Every field has a default so a
//! partial file is valid.

use crate::docker::Timeouts;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// How often the active view is refetched
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Seconds a success banner stays visible
    #[serde(default = "default_status_timeout_secs")]
    pub status_timeout_secs: u64,

    /// Seconds an error banner stays visible
    #[serde(default = "default_error_timeout_secs")]
    pub error_timeout_secs: u64,

    #[serde(default)]
    pub timeouts: TimeoutConfig,

    #[serde(default)]
    pub logger: LoggerConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Deadlines for daemon calls, in seconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutConfig {
    #[serde(default = "default_list_secs")]
    pub list_secs: u64,

    /// start, stop, restart, network and volume calls
    #[serde(default = "default_operation_secs")]
    pub operation_secs: u64,

    /// container and image removal, prune
    #[serde(default = "default_remove_secs")]
    pub remove_secs: u64,

    /// whole group or compose project
    #[serde(default = "default_batch_secs")]
    pub batch_secs: u64,

    #[serde(default = "default_recreate_secs")]
    pub recreate_secs: u64,

    #[serde(default = "default_pull_secs")]
    pub pull_secs: u64,

    /// Grace period given to a container before it is killed on stop
    #[serde(default = "default_stop_grace_secs")]
    pub stop_grace_secs: u64,
}

/// Log viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Initial line count ("all" for everything)
    #[serde(default = "default_log_tail")]
    pub tail: String,

    /// Max log lines kept in the view
    #[serde(default = "default_log_buffer")]
    pub buffer: usize,

    /// Keep streaming new lines
    #[serde(default = "default_true")]
    pub follow: bool,

    #[serde(default = "default_true")]
    pub timestamps: bool,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    #[serde(default = "default_false")]
    pub enable_mouse: bool,

    /// Points of CPU history kept by the stats view
    #[serde(default = "default_stats_history")]
    pub stats_history: usize,
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms.max(100))
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs)
    }

    pub fn error_timeout(&self) -> Duration {
        Duration::from_secs(self.error_timeout_secs)
    }
}

impl TimeoutConfig {
    pub fn batch(&self) -> Duration {
        Duration::from_secs(self.batch_secs)
    }

    pub fn recreate(&self) -> Duration {
        Duration::from_secs(self.recreate_secs)
    }

    pub fn stop_grace(&self) -> Duration {
        Duration::from_secs(self.stop_grace_secs)
    }
}

impl From<&TimeoutConfig> for Timeouts {
    fn from(config: &TimeoutConfig) -> Self {
        Timeouts {
            list: Duration::from_secs(config.list_secs),
            operation: Duration::from_secs(config.operation_secs),
            remove: Duration::from_secs(config.remove_secs),
            pull: Duration::from_secs(config.pull_secs),
        }
    }
}

// Default value functions
fn default_refresh_interval_ms() -> u64 {
    2000
}

fn default_status_timeout_secs() -> u64 {
    2
}

fn default_error_timeout_secs() -> u64 {
    3
}

fn default_list_secs() -> u64 {
    5
}

fn default_operation_secs() -> u64 {
    10
}

fn default_remove_secs() -> u64 {
    30
}

fn default_batch_secs() -> u64 {
    30
}

fn default_recreate_secs() -> u64 {
    60
}

fn default_pull_secs() -> u64 {
    120
}

fn default_stop_grace_secs() -> u64 {
    10
}

fn default_log_tail() -> String {
    "100".to_string()
}

fn default_log_buffer() -> usize {
    1000
}

fn default_stats_history() -> usize {
    60
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_ms: default_refresh_interval_ms(),
            status_timeout_secs: default_status_timeout_secs(),
            error_timeout_secs: default_error_timeout_secs(),
            timeouts: TimeoutConfig::default(),
            logger: LoggerConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            list_secs: default_list_secs(),
            operation_secs: default_operation_secs(),
            remove_secs: default_remove_secs(),
            batch_secs: default_batch_secs(),
            recreate_secs: default_recreate_secs(),
            pull_secs: default_pull_secs(),
            stop_grace_secs: default_stop_grace_secs(),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            tail: default_log_tail(),
            buffer: default_log_buffer(),
            follow: default_true(),
            timestamps: default_true(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            enable_mouse: default_false(),
            stats_history: default_stats_history(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "refreshIntervalMs: 500\nlogger:\n  buffer: 50\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.refresh_interval_ms, 500);
        assert_eq!(config.logger.buffer, 50);
        assert_eq!(config.logger.tail, "100");
        assert_eq!(config.timeouts, TimeoutConfig::default());
    }

    #[test]
    fn test_client_timeouts_from_config() {
        let timeouts = Timeouts::from(&TimeoutConfig::default());
        assert_eq!(timeouts, Timeouts::default());
    }

    #[test]
    fn test_refresh_interval_has_floor() {
        let config = Config {
            refresh_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.refresh_interval(), Duration::from_millis(100));
    }
}
