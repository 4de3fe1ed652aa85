//! User-defined container groups and their persisted form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const GROUP_CONFIG_VERSION: &str = "1.0";
const GROUP_COLORS: [&str; 6] = ["blue", "green", "yellow", "magenta", "cyan", "red"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub container_ids: Vec<String>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub color: String,
}

impl Group {
    pub fn contains(&self, container_id: &str) -> bool {
        self.container_ids.iter().any(|id| id == container_id)
    }
}

/// On-disk document holding every group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub version: String,
    #[serde(default)]
    pub groups: Vec<Group>,
    pub last_modified: DateTime<Utc>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            version: GROUP_CONFIG_VERSION.to_string(),
            groups: Vec::new(),
            last_modified: Utc::now(),
        }
    }
}

impl GroupConfig {
    pub fn find(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }
}

/// Color for the group created at `index`
pub fn group_color(index: usize) -> &'static str {
    GROUP_COLORS[index % GROUP_COLORS.len()]
}
