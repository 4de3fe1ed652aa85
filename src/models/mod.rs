//! Dockhand model layer
//!
//! Plain data types for the resources shown in the UI. Nothing in here talks
//! to the Docker daemon; the `docker` module converts API responses into these.

pub mod compose;
pub mod container;
pub mod group;
pub mod image;
pub mod network;
pub mod stats;
pub mod volume;

pub use compose::{ComposeProject, ComposeService, group_compose_projects};
pub use container::{
    Container, ContainerSpec, EnvVar, MountPoint, NetworkAttachment, PortBinding, PortMapping,
    RestartPolicy, env_to_strings, parse_env,
};
pub use group::{Group, GroupConfig, group_color};
pub use image::{Image, sort_images};
pub use network::Network;
pub use stats::{ContainerStats, CpuSample, LogEntry, LogStream, cpu_percent, memory_percent};
pub use volume::Volume;

/// Shorten a Docker id to the 12 characters shown in the UI
pub fn short_id(id: &str) -> &str {
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    match id.char_indices().nth(12) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_truncates_and_strips_digest_prefix() {
        assert_eq!(short_id("0123456789abcdef"), "0123456789ab");
        assert_eq!(short_id("sha256:0123456789abcdef"), "0123456789ab");
        assert_eq!(short_id("abc"), "abc");
    }
}
