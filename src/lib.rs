//! dockhand library
//!
//! Core functionality of the dockhand TUI: the Docker client seam, the
//! group store, configuration and the command runtime. The terminal UI
//! lives behind the `tui` feature.

pub mod cli;
pub mod config;
pub mod docker;
pub mod groups;
pub mod models;
pub mod runtime;
pub mod services;
#[cfg(feature = "tui")]
pub mod tui;

pub use docker::{ClientError, DockerClient, ResourceClient};
pub use groups::{GroupStore, GroupStoreError};
