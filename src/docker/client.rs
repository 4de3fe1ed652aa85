//! `bollard` implementation of [`ResourceClient`]

use super::convert::{
    container_from_summary, image_from_summary, network_from_api, restart_policy_enum,
    spec_from_inspect, stats_from_api, volume_from_api,
};
use super::{
    ClientError, LOG_CHANNEL_CAPACITY, LogOptions, ResourceClient, STATS_CHANNEL_CAPACITY,
    StreamChannels, Timeouts, stream_channels,
};
use crate::models::{
    ComposeProject, Container, ContainerSpec, ContainerStats, Image, LogEntry, LogStream, Network,
    Volume, group_compose_projects, sort_images,
};
use async_trait::async_trait;
use bollard::Docker;
use bollard::container::{
    Config, CreateContainerOptions, ListContainersOptions, LogOutput, LogsOptions,
    NetworkingConfig, RemoveContainerOptions, RestartContainerOptions, StartContainerOptions,
    StatsOptions, StopContainerOptions,
};
use bollard::image::{CreateImageOptions, ListImagesOptions, RemoveImageOptions};
use bollard::models::{EndpointSettings, HostConfig, PortBinding, RestartPolicy};
use bollard::network::{
    ConnectNetworkOptions, CreateNetworkOptions, DisconnectNetworkOptions, ListNetworksOptions,
};
use bollard::volume::{ListVolumesOptions, PruneVolumesOptions, RemoveVolumeOptions};
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Docker Engine client over the local socket (or `DOCKER_HOST`)
#[derive(Clone)]
pub struct DockerClient {
    docker: Docker,
    timeouts: Timeouts,
}

impl DockerClient {
    /// Connect using the platform defaults. The connection is lazy; call
    /// [`ResourceClient::ping`] to verify the daemon is reachable.
    pub fn connect(timeouts: Timeouts) -> Result<Self, ClientError> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self { docker, timeouts })
    }

    async fn bounded<T, F>(&self, operation: &str, limit: Duration, fut: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, bollard::errors::Error>>,
    {
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result.map_err(ClientError::from),
            Err(_) => Err(ClientError::timeout(operation, limit)),
        }
    }
}

fn split_log_output(output: LogOutput, timestamps: bool) -> Vec<LogEntry> {
    let (stream, bytes) = match output {
        LogOutput::StdErr { message } => (LogStream::Stderr, message),
        LogOutput::StdOut { message }
        | LogOutput::Console { message }
        | LogOutput::StdIn { message } => (LogStream::Stdout, message),
    };

    String::from_utf8_lossy(&bytes)
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (timestamp, text) = if timestamps {
                parse_timestamped(line)
            } else {
                (Utc::now(), line)
            };
            LogEntry {
                line: text.trim_end_matches('\r').to_string(),
                timestamp,
                stream,
            }
        })
        .collect()
}

/// Lines carry an RFC3339 prefix when timestamps are requested
fn parse_timestamped(line: &str) -> (DateTime<Utc>, &str) {
    if let Some((prefix, rest)) = line.split_once(' ') {
        if let Ok(ts) = DateTime::parse_from_rfc3339(prefix) {
            return (ts.with_timezone(&Utc), rest);
        }
    }
    (Utc::now(), line)
}

fn to_config(spec: &ContainerSpec) -> Config<String> {
    let port_bindings: HashMap<String, Option<Vec<PortBinding>>> = spec
        .port_bindings
        .iter()
        .map(|(port, bindings)| {
            let bindings = bindings
                .iter()
                .map(|b| PortBinding {
                    host_ip: Some(b.host_ip.clone()).filter(|s| !s.is_empty()),
                    host_port: Some(b.host_port.clone()).filter(|s| !s.is_empty()),
                })
                .collect();
            (port.clone(), Some(bindings))
        })
        .collect();
    let exposed_ports: HashMap<String, HashMap<(), ()>> = spec
        .port_bindings
        .keys()
        .map(|port| (port.clone(), HashMap::new()))
        .collect();

    let networking_config = spec.primary_network().map(|net| {
        let mut endpoints_config = HashMap::new();
        endpoints_config.insert(
            net.name.clone(),
            EndpointSettings {
                aliases: Some(net.aliases.clone()).filter(|a| !a.is_empty()),
                ..Default::default()
            },
        );
        NetworkingConfig { endpoints_config }
    });

    let non_empty = |s: &String| Some(s.clone()).filter(|s| !s.is_empty());
    let non_empty_vec = |v: &Vec<String>| Some(v.clone()).filter(|v| !v.is_empty());

    Config {
        image: non_empty(&spec.image),
        env: non_empty_vec(&spec.env),
        cmd: non_empty_vec(&spec.cmd),
        entrypoint: non_empty_vec(&spec.entrypoint),
        working_dir: non_empty(&spec.working_dir),
        user: non_empty(&spec.user),
        labels: Some(spec.labels.clone()),
        exposed_ports: Some(exposed_ports).filter(|p| !p.is_empty()),
        host_config: Some(HostConfig {
            binds: non_empty_vec(&spec.binds),
            port_bindings: Some(port_bindings).filter(|p| !p.is_empty()),
            restart_policy: restart_policy_enum(&spec.restart_policy.name).map(|name| {
                RestartPolicy {
                    name: Some(name),
                    maximum_retry_count: Some(spec.restart_policy.maximum_retry_count),
                }
            }),
            network_mode: non_empty(&spec.network_mode),
            privileged: Some(spec.privileged),
            cap_add: non_empty_vec(&spec.cap_add),
            cap_drop: non_empty_vec(&spec.cap_drop),
            ..Default::default()
        }),
        networking_config,
        ..Default::default()
    }
}

#[async_trait]
impl ResourceClient for DockerClient {
    async fn ping(&self) -> Result<(), ClientError> {
        self.bounded("ping", self.timeouts.list, self.docker.ping())
            .await
            .map(|_| ())
    }

    async fn list_containers(&self) -> Result<Vec<Container>, ClientError> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };
        let summaries = self
            .bounded(
                "list containers",
                self.timeouts.list,
                self.docker.list_containers(Some(options)),
            )
            .await?;
        let mut containers: Vec<Container> =
            summaries.into_iter().map(container_from_summary).collect();
        containers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(containers)
    }

    async fn list_images(&self) -> Result<Vec<Image>, ClientError> {
        let options = ListImagesOptions::<String> {
            all: false,
            ..Default::default()
        };
        let summaries = self
            .bounded(
                "list images",
                self.timeouts.list,
                self.docker.list_images(Some(options)),
            )
            .await?;
        let mut images: Vec<Image> = summaries.into_iter().map(image_from_summary).collect();
        sort_images(&mut images);
        Ok(images)
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>, ClientError> {
        let response = self
            .bounded(
                "list volumes",
                self.timeouts.list,
                self.docker.list_volumes(None::<ListVolumesOptions<String>>),
            )
            .await?;
        let mut volumes: Vec<Volume> = response
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(volume_from_api)
            .collect();
        volumes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(volumes)
    }

    async fn list_networks(&self) -> Result<Vec<Network>, ClientError> {
        let networks = self
            .bounded(
                "list networks",
                self.timeouts.list,
                self.docker.list_networks(None::<ListNetworksOptions<String>>),
            )
            .await?;
        let mut networks: Vec<Network> = networks.into_iter().map(network_from_api).collect();
        networks.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(networks)
    }

    async fn list_compose_projects(&self) -> Result<Vec<ComposeProject>, ClientError> {
        let containers = self.list_containers().await?;
        Ok(group_compose_projects(containers))
    }

    async fn inspect_container_spec(&self, id: &str) -> Result<ContainerSpec, ClientError> {
        let result = self
            .bounded(
                "inspect container",
                self.timeouts.list,
                self.docker.inspect_container(id, None),
            )
            .await;
        match result {
            Ok(inspect) => Ok(spec_from_inspect(inspect)),
            Err(ClientError::Docker(bollard::errors::Error::DockerResponseServerError {
                status_code: 404,
                ..
            })) => Err(ClientError::NotFound {
                kind: "container",
                id: id.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    async fn start_container(&self, id: &str) -> Result<(), ClientError> {
        self.bounded(
            "start container",
            self.timeouts.operation,
            self.docker
                .start_container(id, None::<StartContainerOptions<String>>),
        )
        .await
    }

    async fn stop_container(&self, id: &str, grace: Duration) -> Result<(), ClientError> {
        let options = StopContainerOptions {
            t: grace.as_secs() as i64,
        };
        self.bounded(
            "stop container",
            self.timeouts.operation + grace,
            self.docker.stop_container(id, Some(options)),
        )
        .await
    }

    async fn restart_container(&self, id: &str, grace: Duration) -> Result<(), ClientError> {
        let options = RestartContainerOptions {
            t: grace.as_secs() as isize,
        };
        self.bounded(
            "restart container",
            self.timeouts.operation + grace,
            self.docker.restart_container(id, Some(options)),
        )
        .await
    }

    async fn remove_container(&self, id: &str, force: bool) -> Result<(), ClientError> {
        let options = RemoveContainerOptions {
            force,
            ..Default::default()
        };
        self.bounded(
            "remove container",
            self.timeouts.remove,
            self.docker.remove_container(id, Some(options)),
        )
        .await
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<String, ClientError> {
        let options = Some(spec.name.clone())
            .filter(|name| !name.is_empty())
            .map(|name| CreateContainerOptions {
                name,
                platform: None,
            });
        let response = self
            .bounded(
                "create container",
                self.timeouts.operation,
                self.docker.create_container(options, to_config(spec)),
            )
            .await?;
        for warning in &response.warnings {
            tracing::warn!(container = %spec.name, "create warning: {}", warning);
        }
        Ok(response.id)
    }

    async fn attach_network(
        &self,
        network_id: &str,
        container_id: &str,
        aliases: &[String],
    ) -> Result<(), ClientError> {
        let options = ConnectNetworkOptions {
            container: container_id.to_string(),
            endpoint_config: EndpointSettings {
                aliases: Some(aliases.to_vec()).filter(|a| !a.is_empty()),
                ..Default::default()
            },
        };
        self.bounded(
            "attach network",
            self.timeouts.operation,
            self.docker.connect_network(network_id, options),
        )
        .await
    }

    async fn detach_network(
        &self,
        network_id: &str,
        container_id: &str,
    ) -> Result<(), ClientError> {
        let options = DisconnectNetworkOptions {
            container: container_id.to_string(),
            force: false,
        };
        self.bounded(
            "detach network",
            self.timeouts.operation,
            self.docker.disconnect_network(network_id, options),
        )
        .await
    }

    async fn create_network(&self, name: &str, driver: &str) -> Result<(), ClientError> {
        let options = CreateNetworkOptions {
            name: name.to_string(),
            driver: driver.to_string(),
            ..Default::default()
        };
        self.bounded(
            "create network",
            self.timeouts.operation,
            self.docker.create_network(options),
        )
        .await
        .map(|_| ())
    }

    async fn remove_network(&self, id: &str) -> Result<(), ClientError> {
        self.bounded(
            "remove network",
            self.timeouts.operation,
            self.docker.remove_network(id),
        )
        .await
    }

    async fn remove_image(&self, id: &str, force: bool) -> Result<(), ClientError> {
        let options = RemoveImageOptions {
            force,
            noprune: false,
        };
        self.bounded(
            "remove image",
            self.timeouts.remove,
            self.docker.remove_image(id, Some(options), None),
        )
        .await
        .map(|_| ())
    }

    async fn pull_image(&self, reference: &str) -> Result<(), ClientError> {
        let options = CreateImageOptions {
            from_image: reference.to_string(),
            ..Default::default()
        };
        let pull = self
            .docker
            .create_image(Some(options), None, None)
            .try_for_each(|info| async move {
                if let Some(status) = info.status {
                    tracing::debug!("pull: {}", status);
                }
                Ok(())
            });
        self.bounded("pull image", self.timeouts.pull, pull).await
    }

    async fn remove_volume(&self, name: &str, force: bool) -> Result<(), ClientError> {
        self.bounded(
            "remove volume",
            self.timeouts.operation,
            self.docker
                .remove_volume(name, Some(RemoveVolumeOptions { force })),
        )
        .await
    }

    async fn prune_volumes(&self) -> Result<u64, ClientError> {
        let response = self
            .bounded(
                "prune volumes",
                self.timeouts.remove,
                self.docker
                    .prune_volumes(None::<PruneVolumesOptions<String>>),
            )
            .await?;
        Ok(response.space_reclaimed.unwrap_or(0).max(0) as u64)
    }

    fn stream_logs(
        &self,
        id: &str,
        options: LogOptions,
        token: CancellationToken,
    ) -> StreamChannels<LogEntry> {
        let (tx, rx) = stream_channels(LOG_CHANNEL_CAPACITY);
        let docker = self.docker.clone();
        let id = id.to_string();

        tokio::spawn(async move {
            let timestamps = options.timestamps;
            let api_options = LogsOptions::<String> {
                follow: options.follow,
                stdout: true,
                stderr: true,
                since: options.since,
                timestamps,
                tail: options.tail,
                ..Default::default()
            };
            let mut stream = docker.logs(&id, Some(api_options));

            loop {
                let item = tokio::select! {
                    _ = token.cancelled() => break,
                    item = stream.next() => item,
                };
                match item {
                    Some(Ok(output)) => {
                        for entry in split_log_output(output, timestamps) {
                            tokio::select! {
                                _ = token.cancelled() => return,
                                sent = tx.data.send(entry) => {
                                    if sent.is_err() {
                                        return;
                                    }
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        let _ = tx.errors.try_send(ClientError::Stream(e.to_string()));
                        break;
                    }
                    None => break,
                }
            }
            tracing::debug!(container = %id, "log stream finished");
        });

        rx
    }

    fn stream_stats(&self, id: &str, token: CancellationToken) -> StreamChannels<ContainerStats> {
        let (tx, rx) = stream_channels(STATS_CHANNEL_CAPACITY);
        let docker = self.docker.clone();
        let id = id.to_string();

        tokio::spawn(async move {
            let options = StatsOptions {
                stream: true,
                one_shot: false,
            };
            let mut stream = docker.stats(&id, Some(options));

            loop {
                let item = tokio::select! {
                    _ = token.cancelled() => break,
                    item = stream.next() => item,
                };
                match item {
                    Some(Ok(stats)) => {
                        let sample = stats_from_api(&id, &stats);
                        // Drop samples rather than block when the UI falls behind
                        if let Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) =
                            tx.data.try_send(sample)
                        {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        let _ = tx.errors.try_send(ClientError::Stream(e.to_string()));
                        break;
                    }
                    None => break,
                }
            }
            tracing::debug!(container = %id, "stats stream finished");
        });

        rx
    }
}
