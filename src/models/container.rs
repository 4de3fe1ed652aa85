//! Container types and env var helpers

use chrono::{DateTime, Utc};
use std::collections::HashMap;

pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";
pub const COMPOSE_SERVICE_LABEL: &str = "com.docker.compose.service";
pub const COMPOSE_WORKING_DIR_LABEL: &str = "com.docker.compose.project.working_dir";

/// A container as listed by the daemon
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub image: String,
    pub image_id: String,
    /// Human readable status ("Up 3 minutes")
    pub status: String,
    /// Machine state: running, exited, paused, created...
    pub state: String,
    pub created: Option<DateTime<Utc>>,
    pub ports: Vec<PortMapping>,
    pub networks: Vec<String>,
    pub mounts: Vec<MountPoint>,
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortMapping {
    pub private_port: u16,
    pub public_port: Option<u16>,
    pub protocol: String,
    pub ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MountPoint {
    /// volume, bind or tmpfs
    pub kind: String,
    pub name: Option<String>,
    pub source: String,
    pub destination: String,
    pub read_only: bool,
}

impl Container {
    pub fn short_id(&self) -> &str {
        super::short_id(&self.id)
    }

    pub fn is_running(&self) -> bool {
        self.state == "running"
    }

    pub fn ports_display(&self) -> String {
        self.ports
            .iter()
            .map(|p| match p.public_port {
                Some(public) if public > 0 => {
                    format!("{}:{}/{}", public, p.private_port, p.protocol)
                }
                _ => format!("{}/{}", p.private_port, p.protocol),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn compose_project(&self) -> Option<&str> {
        self.labels.get(COMPOSE_PROJECT_LABEL).map(String::as_str)
    }

    pub fn compose_service(&self) -> Option<&str> {
        self.labels.get(COMPOSE_SERVICE_LABEL).map(String::as_str)
    }

    /// Whether this container mounts the named volume
    pub fn uses_volume(&self, volume: &str) -> bool {
        self.mounts
            .iter()
            .any(|m| m.kind == "volume" && m.name.as_deref() == Some(volume))
    }
}

/// Everything needed to create an equivalent container after removing one
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    /// `KEY=value` entries
    pub env: Vec<String>,
    pub cmd: Vec<String>,
    pub entrypoint: Vec<String>,
    pub working_dir: String,
    pub user: String,
    pub labels: HashMap<String, String>,
    pub binds: Vec<String>,
    /// Keyed by `"<port>/<proto>"`
    pub port_bindings: HashMap<String, Vec<PortBinding>>,
    pub restart_policy: RestartPolicy,
    pub network_mode: String,
    pub privileged: bool,
    pub cap_add: Vec<String>,
    pub cap_drop: Vec<String>,
    /// Ordered; only the first entry is attached at create time
    pub networks: Vec<NetworkAttachment>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortBinding {
    pub host_ip: String,
    pub host_port: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RestartPolicy {
    pub name: String,
    pub maximum_retry_count: i64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetworkAttachment {
    pub name: String,
    pub network_id: String,
    pub aliases: Vec<String>,
    pub ip_address: String,
}

impl ContainerSpec {
    pub fn primary_network(&self) -> Option<&NetworkAttachment> {
        self.networks.first()
    }

    pub fn secondary_networks(&self) -> &[NetworkAttachment] {
        self.networks.get(1..).unwrap_or(&[])
    }
}

/// One editable environment variable
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Split `KEY=value` entries on the first `=`
pub fn parse_env(env: &[String]) -> Vec<EnvVar> {
    env.iter()
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => EnvVar::new(key, value),
            None => EnvVar::new(entry.as_str(), ""),
        })
        .collect()
}

pub fn env_to_strings(vars: &[EnvVar]) -> Vec<String> {
    vars.iter().map(|v| format!("{}={}", v.key, v.value)).collect()
}
