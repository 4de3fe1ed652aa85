//! Conversions from Docker API payloads into application models

use crate::models::{
    Container, ContainerSpec, ContainerStats, CpuSample, Image, MountPoint, Network,
    NetworkAttachment, PortBinding, PortMapping, RestartPolicy, Volume, cpu_percent,
    memory_percent,
};
use bollard::container::Stats;
use bollard::models::{
    ContainerInspectResponse, ContainerSummary, ImageSummary, MountPointTypeEnum,
    Network as ApiNetwork, PortTypeEnum, RestartPolicyNameEnum, Volume as ApiVolume,
    VolumeScopeEnum,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    if secs <= 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

fn rfc3339(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
}

fn port_protocol(typ: Option<&PortTypeEnum>) -> &'static str {
    match typ {
        Some(PortTypeEnum::UDP) => "udp",
        Some(PortTypeEnum::SCTP) => "sctp",
        _ => "tcp",
    }
}

fn mount_kind(typ: Option<&MountPointTypeEnum>) -> &'static str {
    match typ {
        Some(MountPointTypeEnum::BIND) => "bind",
        Some(MountPointTypeEnum::VOLUME) => "volume",
        Some(MountPointTypeEnum::TMPFS) => "tmpfs",
        Some(MountPointTypeEnum::NPIPE) => "npipe",
        Some(MountPointTypeEnum::CLUSTER) => "cluster",
        _ => "",
    }
}

pub fn container_from_summary(summary: ContainerSummary) -> Container {
    let name = summary
        .names
        .as_ref()
        .and_then(|names| names.first())
        .map(|n| n.trim_start_matches('/').to_string())
        .unwrap_or_default();

    let mut ports: Vec<PortMapping> = summary
        .ports
        .unwrap_or_default()
        .into_iter()
        .map(|p| PortMapping {
            private_port: p.private_port,
            public_port: p.public_port,
            protocol: port_protocol(p.typ.as_ref()).to_string(),
            ip: p.ip,
        })
        .collect();
    // IPv4 and IPv6 bindings of the same port show up twice
    ports.sort_by(|a, b| {
        (a.private_port, a.public_port, &a.protocol).cmp(&(b.private_port, b.public_port, &b.protocol))
    });
    ports.dedup_by(|a, b| {
        a.private_port == b.private_port
            && a.public_port == b.public_port
            && a.protocol == b.protocol
    });

    let mut networks: Vec<String> = summary
        .network_settings
        .and_then(|s| s.networks)
        .map(|n| n.into_keys().collect())
        .unwrap_or_default();
    networks.sort();

    let mounts = summary
        .mounts
        .unwrap_or_default()
        .into_iter()
        .map(|m| MountPoint {
            kind: mount_kind(m.typ.as_ref()).to_string(),
            name: m.name,
            source: m.source.unwrap_or_default(),
            destination: m.destination.unwrap_or_default(),
            read_only: !m.rw.unwrap_or(true),
        })
        .collect();

    Container {
        id: summary.id.unwrap_or_default(),
        name,
        image: summary.image.unwrap_or_default(),
        image_id: summary.image_id.unwrap_or_default(),
        status: summary.status.unwrap_or_default(),
        state: summary.state.unwrap_or_default(),
        created: summary.created.and_then(timestamp),
        ports,
        networks,
        mounts,
        labels: summary.labels.unwrap_or_default(),
    }
}

pub fn image_from_summary(summary: ImageSummary) -> Image {
    Image {
        id: summary.id,
        repo_tags: summary.repo_tags,
        created: timestamp(summary.created),
        size: summary.size,
        containers: summary.containers.max(0) as usize,
    }
}

pub fn volume_from_api(volume: ApiVolume) -> Volume {
    let scope = match volume.scope {
        Some(VolumeScopeEnum::GLOBAL) => "global",
        _ => "local",
    };
    let (ref_count, size) = match volume.usage_data {
        Some(usage) => (Some(usage.ref_count), Some(usage.size)),
        None => (None, None),
    };

    Volume {
        name: volume.name,
        driver: volume.driver,
        mountpoint: volume.mountpoint,
        created: rfc3339(volume.created_at.as_deref()),
        scope: scope.to_string(),
        labels: volume.labels,
        ref_count,
        size,
    }
}

pub fn network_from_api(network: ApiNetwork) -> Network {
    let ipam_config = network
        .ipam
        .and_then(|ipam| ipam.config)
        .and_then(|configs| configs.into_iter().next());
    let (subnet, gateway) = match ipam_config {
        Some(config) => (config.subnet, config.gateway),
        None => (None, None),
    };

    let mut containers: Vec<String> = network
        .containers
        .map(|c| c.into_keys().collect())
        .unwrap_or_default();
    containers.sort();

    Network {
        id: network.id.unwrap_or_default(),
        name: network.name.unwrap_or_default(),
        driver: network.driver.unwrap_or_default(),
        scope: network.scope.unwrap_or_default(),
        internal: network.internal.unwrap_or(false),
        attachable: network.attachable.unwrap_or(false),
        containers,
        subnet,
        gateway,
    }
}

fn restart_policy_name(name: Option<&RestartPolicyNameEnum>) -> &'static str {
    match name {
        Some(RestartPolicyNameEnum::ALWAYS) => "always",
        Some(RestartPolicyNameEnum::UNLESS_STOPPED) => "unless-stopped",
        Some(RestartPolicyNameEnum::ON_FAILURE) => "on-failure",
        Some(RestartPolicyNameEnum::NO) => "no",
        _ => "",
    }
}

pub fn restart_policy_enum(name: &str) -> Option<RestartPolicyNameEnum> {
    match name {
        "always" => Some(RestartPolicyNameEnum::ALWAYS),
        "unless-stopped" => Some(RestartPolicyNameEnum::UNLESS_STOPPED),
        "on-failure" => Some(RestartPolicyNameEnum::ON_FAILURE),
        "no" => Some(RestartPolicyNameEnum::NO),
        _ => None,
    }
}

/// Build a recreate spec from an inspect response.
///
/// Networks are ordered with the one named by `network_mode` first so that
/// it is the network attached at creation time.
pub fn spec_from_inspect(inspect: ContainerInspectResponse) -> ContainerSpec {
    let config = inspect.config.unwrap_or_default();
    let host = inspect.host_config.unwrap_or_default();

    let port_bindings: HashMap<String, Vec<PortBinding>> = host
        .port_bindings
        .unwrap_or_default()
        .into_iter()
        .map(|(port, bindings)| {
            let bindings = bindings
                .unwrap_or_default()
                .into_iter()
                .map(|b| PortBinding {
                    host_ip: b.host_ip.unwrap_or_default(),
                    host_port: b.host_port.unwrap_or_default(),
                })
                .collect();
            (port, bindings)
        })
        .collect();

    let restart_policy = host
        .restart_policy
        .map(|p| RestartPolicy {
            name: restart_policy_name(p.name.as_ref()).to_string(),
            maximum_retry_count: p.maximum_retry_count.unwrap_or(0),
        })
        .unwrap_or_default();

    let network_mode = host.network_mode.unwrap_or_default();
    let mut networks: Vec<NetworkAttachment> = inspect
        .network_settings
        .and_then(|s| s.networks)
        .unwrap_or_default()
        .into_iter()
        .map(|(name, endpoint)| NetworkAttachment {
            name,
            network_id: endpoint.network_id.unwrap_or_default(),
            aliases: endpoint.aliases.unwrap_or_default(),
            ip_address: endpoint.ip_address.unwrap_or_default(),
        })
        .collect();
    networks.sort_by(|a, b| {
        (a.name != network_mode, &a.name).cmp(&(b.name != network_mode, &b.name))
    });

    ContainerSpec {
        name: inspect
            .name
            .unwrap_or_default()
            .trim_start_matches('/')
            .to_string(),
        image: config.image.unwrap_or_default(),
        env: config.env.unwrap_or_default(),
        cmd: config.cmd.unwrap_or_default(),
        entrypoint: config.entrypoint.unwrap_or_default(),
        working_dir: config.working_dir.unwrap_or_default(),
        user: config.user.unwrap_or_default(),
        labels: config.labels.unwrap_or_default(),
        binds: host.binds.unwrap_or_default(),
        port_bindings,
        restart_policy,
        network_mode,
        privileged: host.privileged.unwrap_or(false),
        cap_add: host.cap_add.unwrap_or_default(),
        cap_drop: host.cap_drop.unwrap_or_default(),
        networks,
    }
}

fn cpu_sample(stats: &bollard::container::CPUStats) -> CpuSample {
    CpuSample {
        total_usage: stats.cpu_usage.total_usage,
        system_usage: stats.system_cpu_usage.unwrap_or(0),
        online_cpus: stats.online_cpus,
        percpu_count: stats
            .cpu_usage
            .percpu_usage
            .as_ref()
            .map(Vec::len)
            .unwrap_or(0),
    }
}

pub fn stats_from_api(container_id: &str, stats: &Stats) -> ContainerStats {
    let memory_usage = stats.memory_stats.usage.unwrap_or(0);
    let memory_limit = stats.memory_stats.limit.unwrap_or(0);

    let (network_rx, network_tx) = stats
        .networks
        .as_ref()
        .map(|nets| {
            nets.values()
                .fold((0, 0), |(rx, tx), n| (rx + n.rx_bytes, tx + n.tx_bytes))
        })
        .unwrap_or((0, 0));

    let (block_read, block_write) = stats
        .blkio_stats
        .io_service_bytes_recursive
        .as_ref()
        .map(|entries| {
            entries.iter().fold((0, 0), |(r, w), e| {
                match e.op.to_ascii_lowercase().as_str() {
                    "read" => (r + e.value, w),
                    "write" => (r, w + e.value),
                    _ => (r, w),
                }
            })
        })
        .unwrap_or((0, 0));

    ContainerStats {
        container_id: container_id.to_string(),
        cpu_percent: cpu_percent(cpu_sample(&stats.precpu_stats), cpu_sample(&stats.cpu_stats)),
        memory_usage,
        memory_limit,
        memory_percent: memory_percent(memory_usage, memory_limit),
        network_rx,
        network_tx,
        block_read,
        block_write,
        pids: stats.pids_stats.current.unwrap_or(0),
        timestamp: rfc3339(Some(stats.read.as_str())).or_else(|| Some(Utc::now())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::{EndpointSettings, HostConfig, NetworkSettings, Port};

    #[test]
    fn test_container_summary_strips_slash_and_dedups_ports() {
        let port = Port {
            ip: Some("0.0.0.0".into()),
            private_port: 80,
            public_port: Some(8080),
            typ: Some(PortTypeEnum::TCP),
        };
        let summary = ContainerSummary {
            id: Some("abcdef".into()),
            names: Some(vec!["/web".into()]),
            state: Some("running".into()),
            ports: Some(vec![
                port.clone(),
                Port {
                    ip: Some("::".into()),
                    ..port
                },
            ]),
            ..Default::default()
        };

        let container = container_from_summary(summary);
        assert_eq!(container.name, "web");
        assert_eq!(container.ports.len(), 1);
        assert_eq!(container.ports_display(), "8080:80/tcp");
    }

    #[test]
    fn test_spec_orders_network_mode_first() {
        let mut networks = HashMap::new();
        for name in ["alpha", "backend"] {
            networks.insert(
                name.to_string(),
                EndpointSettings {
                    network_id: Some(format!("{}-id", name)),
                    aliases: Some(vec![format!("{}-alias", name)]),
                    ..Default::default()
                },
            );
        }
        let inspect = ContainerInspectResponse {
            name: Some("/api".into()),
            host_config: Some(HostConfig {
                network_mode: Some("backend".into()),
                ..Default::default()
            }),
            network_settings: Some(NetworkSettings {
                networks: Some(networks),
                ..Default::default()
            }),
            ..Default::default()
        };

        let spec = spec_from_inspect(inspect);
        assert_eq!(spec.name, "api");
        let names: Vec<_> = spec.networks.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["backend", "alpha"]);
        assert_eq!(spec.primary_network().map(|n| n.network_id.as_str()), Some("backend-id"));
    }

    #[test]
    fn test_restart_policy_names_round_trip() {
        for name in ["always", "unless-stopped", "on-failure", "no"] {
            let parsed = restart_policy_enum(name);
            assert_eq!(restart_policy_name(parsed.as_ref()), name);
        }
        assert!(restart_policy_enum("").is_none());
    }
}
