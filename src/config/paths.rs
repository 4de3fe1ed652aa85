//! Configuration directory resolution
//!
//! - Unix (Linux/macOS): XDG_CONFIG_HOME/dockhand or ~/.config/dockhand
//! - Windows: %APPDATA%\dockhand\config

use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "dockhand";

/// Get the configuration directory path
///
/// Checks DOCKHAND_CONFIG_DIR first, then falls back to the platform default.
pub fn config_dir() -> PathBuf {
    std::env::var("DOCKHAND_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            #[cfg(windows)]
            {
                use directories::ProjectDirs;
                ProjectDirs::from("", "", APP_NAME)
                    .map(|dirs| dirs.config_dir().to_path_buf())
                    .unwrap_or_else(|| PathBuf::from(".").join(".config").join(APP_NAME))
            }
            #[cfg(not(windows))]
            {
                use directories::BaseDirs;
                std::env::var("XDG_CONFIG_HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| {
                        BaseDirs::new()
                            .map(|dirs| dirs.home_dir().join(".config"))
                            .unwrap_or_else(|| PathBuf::from(".").join(".config"))
                    })
                    .join(APP_NAME)
            }
        })
}

/// Settings file
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}

/// Persisted groups
pub fn groups_path() -> PathBuf {
    config_dir().join(crate::groups::store::GROUPS_FILE)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
