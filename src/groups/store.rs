//! JSON-backed group store
//!
//! Every mutation is a read-modify-write under a single write lock and is
//! persisted before the call returns. Saves go through a temp file and keep
//! the previous document as `<file>.bak`.

use crate::models::{Group, GroupConfig, group_color};
use chrono::Utc;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

pub const GROUPS_FILE: &str = "groups.json";

#[derive(Debug, Error)]
pub enum GroupStoreError {
    #[error("group not found: {0}")]
    NotFound(String),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("group store lock poisoned")]
    Poisoned,
}

type Result<T> = std::result::Result<T, GroupStoreError>;

#[derive(Debug)]
pub struct GroupStore {
    path: PathBuf,
    config: RwLock<GroupConfig>,
}

impl GroupStore {
    /// Open the store at `path`, loading an empty document when the file
    /// does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = load(&path)?;
        tracing::debug!(path = %path.display(), groups = config.groups.len(), "opened group store");
        Ok(Self {
            path,
            config: RwLock::new(config),
        })
    }

    /// Open `groups.json` inside a config directory
    pub fn open_in(dir: &Path) -> Result<Self> {
        Self::open(dir.join(GROUPS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> Result<Vec<Group>> {
        let config = self.config.read().map_err(|_| GroupStoreError::Poisoned)?;
        Ok(config.groups.clone())
    }

    pub fn get(&self, id: &str) -> Result<Group> {
        let config = self.config.read().map_err(|_| GroupStoreError::Poisoned)?;
        config
            .find(id)
            .cloned()
            .ok_or_else(|| GroupStoreError::NotFound(id.to_string()))
    }

    pub fn create(&self, name: &str, description: &str, members: Vec<String>) -> Result<Group> {
        self.mutate(|config| {
            let now = Utc::now();
            let group = Group {
                id: uuid::Uuid::new_v4().to_string(),
                name: name.to_string(),
                description: description.to_string(),
                container_ids: members,
                created: now,
                modified: now,
                color: group_color(config.groups.len()).to_string(),
            };
            config.groups.push(group.clone());
            Ok(group)
        })
    }

    /// Replace name, description, members and color of an existing group
    pub fn update(&self, group: &Group) -> Result<Group> {
        self.mutate(|config| {
            let existing = config
                .find_mut(&group.id)
                .ok_or_else(|| GroupStoreError::NotFound(group.id.clone()))?;
            existing.name = group.name.clone();
            existing.description = group.description.clone();
            existing.container_ids = group.container_ids.clone();
            existing.color = group.color.clone();
            existing.modified = Utc::now();
            Ok(existing.clone())
        })
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.mutate(|config| {
            let before = config.groups.len();
            config.groups.retain(|g| g.id != id);
            if config.groups.len() == before {
                return Err(GroupStoreError::NotFound(id.to_string()));
            }
            Ok(())
        })
    }

    /// Adding an existing member is a no-op
    pub fn add_member(&self, group_id: &str, container_id: &str) -> Result<()> {
        self.mutate(|config| {
            let group = config
                .find_mut(group_id)
                .ok_or_else(|| GroupStoreError::NotFound(group_id.to_string()))?;
            if !group.contains(container_id) {
                group.container_ids.push(container_id.to_string());
                group.modified = Utc::now();
            }
            Ok(())
        })
    }

    pub fn remove_member(&self, group_id: &str, container_id: &str) -> Result<()> {
        self.mutate(|config| {
            let group = config
                .find_mut(group_id)
                .ok_or_else(|| GroupStoreError::NotFound(group_id.to_string()))?;
            group.container_ids.retain(|id| id != container_id);
            group.modified = Utc::now();
            Ok(())
        })
    }

    /// Swap a container id in every group, used after a recreate.
    /// Returns the number of groups touched.
    pub fn replace_member(&self, old_id: &str, new_id: &str) -> Result<usize> {
        self.mutate(|config| {
            let now = Utc::now();
            let mut touched = 0;
            for group in &mut config.groups {
                let mut changed = false;
                for id in &mut group.container_ids {
                    if id == old_id {
                        *id = new_id.to_string();
                        changed = true;
                    }
                }
                if changed {
                    let mut seen = HashSet::new();
                    group.container_ids.retain(|id| seen.insert(id.clone()));
                    group.modified = now;
                    touched += 1;
                }
            }
            Ok(touched)
        })
    }

    /// Drop a container id from every group, used after a delete.
    /// Returns the number of groups touched.
    pub fn remove_member_everywhere(&self, container_id: &str) -> Result<usize> {
        self.mutate(|config| {
            let now = Utc::now();
            let mut touched = 0;
            for group in &mut config.groups {
                let before = group.container_ids.len();
                group.container_ids.retain(|id| id != container_id);
                if group.container_ids.len() != before {
                    group.modified = now;
                    touched += 1;
                }
            }
            Ok(touched)
        })
    }

    /// Apply `f` to a copy of the document and persist it; the in-memory
    /// document only changes when both `f` and the save succeed
    fn mutate<T>(&self, f: impl FnOnce(&mut GroupConfig) -> Result<T>) -> Result<T> {
        let mut guard = self.config.write().map_err(|_| GroupStoreError::Poisoned)?;
        let mut next = guard.clone();
        let value = f(&mut next)?;
        next.last_modified = Utc::now();
        save(&self.path, &next)?;
        *guard = next;
        Ok(value)
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> GroupStoreError + '_ {
    move |source| GroupStoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn load(path: &Path) -> Result<GroupConfig> {
    if !path.exists() {
        return Ok(GroupConfig::default());
    }
    let contents = std::fs::read_to_string(path).map_err(io_error(path))?;
    if contents.trim().is_empty() {
        return Ok(GroupConfig::default());
    }
    serde_json::from_str(&contents).map_err(|source| GroupStoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

fn save(path: &Path, config: &GroupConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        crate::config::paths::ensure_dir(parent).map_err(io_error(parent))?;
    }

    let json = serde_json::to_string_pretty(config).map_err(|source| GroupStoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = sibling(path, ".tmp");
    std::fs::write(&tmp, json).map_err(io_error(&tmp))?;

    if path.exists() {
        let backup = sibling(path, ".bak");
        std::fs::rename(path, &backup).map_err(io_error(&backup))?;
    }
    std::fs::rename(&tmp, path).map_err(io_error(path))?;
    Ok(())
}
