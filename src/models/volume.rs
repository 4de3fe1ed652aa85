//! Volume types

use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Volume {
    pub name: String,
    pub driver: String,
    pub mountpoint: String,
    pub created: Option<DateTime<Utc>>,
    pub scope: String,
    pub labels: HashMap<String, String>,
    /// Reference count reported by the daemon, when usage data is available
    pub ref_count: Option<i64>,
    /// Size in bytes, -1 when the daemon could not compute it
    pub size: Option<i64>,
}

impl Volume {
    pub fn driver_or_default(&self) -> &str {
        if self.driver.is_empty() {
            "local"
        } else {
            &self.driver
        }
    }

    pub fn is_in_use(&self) -> bool {
        self.ref_count.is_some_and(|n| n > 0)
    }

    pub fn display_name(&self) -> String {
        if self.name.chars().count() > 40 {
            let truncated: String = self.name.chars().take(37).collect();
            format!("{}...", truncated)
        } else {
            self.name.clone()
        }
    }
}
