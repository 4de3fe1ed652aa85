//! In-memory `ResourceClient` shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use dockhand::docker::{
    ClientError, LOG_CHANNEL_CAPACITY, LogOptions, ResourceClient, STATS_CHANNEL_CAPACITY,
    StreamChannels, StreamSenders, stream_channels,
};
use dockhand::models::{
    ComposeProject, Container, ContainerSpec, ContainerStats, Image, LogEntry, Network, Volume,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const NEW_CONTAINER_ID: &str = "fedcba9876543210fedcba9876543210";

#[derive(Default)]
pub struct FakeClient {
    pub containers: Mutex<Vec<Container>>,
    pub images: Mutex<Vec<Image>>,
    pub volumes: Mutex<Vec<Volume>>,
    pub networks: Mutex<Vec<Network>>,
    pub projects: Mutex<Vec<ComposeProject>>,
    pub specs: Mutex<HashMap<String, ContainerSpec>>,
    /// Every call, formatted as "<operation> <args>"
    pub calls: Mutex<Vec<String>>,
    /// Ids (or operation names) whose calls fail
    pub failing: Mutex<HashSet<String>>,
    /// Ids whose calls never finish within a test
    pub hanging: Mutex<HashSet<String>>,
    pub log_senders: Mutex<Vec<StreamSenders<LogEntry>>>,
    pub stats_senders: Mutex<Vec<StreamSenders<ContainerStats>>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_containers(containers: Vec<Container>) -> Self {
        let client = Self::new();
        *client.containers.lock().unwrap() = containers;
        client
    }

    pub fn fail(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    pub fn hang(&self, id: &str) {
        self.hanging.lock().unwrap().insert(id.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    /// Sender of the most recently opened log stream
    pub fn log_sender(&self) -> Option<StreamSenders<LogEntry>> {
        self.log_senders.lock().unwrap().last().cloned()
    }

    async fn call(&self, operation: &str, target: &str) -> Result<(), ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", operation, target));
        let hangs = self.hanging.lock().unwrap().contains(target);
        if hangs {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        let failing = self.failing.lock().unwrap();
        if failing.contains(target) || failing.contains(operation) {
            return Err(ClientError::Stream(format!("{} {} refused", operation, target)));
        }
        Ok(())
    }
}

pub fn container(id: &str, name: &str, state: &str) -> Container {
    Container {
        id: id.to_string(),
        name: name.to_string(),
        image: format!("{}:latest", name),
        status: if state == "running" {
            "Up 5 minutes".to_string()
        } else {
            "Exited (0) 1 minute ago".to_string()
        },
        state: state.to_string(),
        ..Default::default()
    }
}

#[async_trait]
impl ResourceClient for FakeClient {
    async fn ping(&self) -> Result<(), ClientError> {
        self.call("ping", "daemon").await
    }

    async fn list_containers(&self) -> Result<Vec<Container>, ClientError> {
        self.call("list", "containers").await?;
        Ok(self.containers.lock().unwrap().clone())
    }

    async fn list_images(&self) -> Result<Vec<Image>, ClientError> {
        self.call("list", "images").await?;
        Ok(self.images.lock().unwrap().clone())
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>, ClientError> {
        self.call("list", "volumes").await?;
        Ok(self.volumes.lock().unwrap().clone())
    }

    async fn list_networks(&self) -> Result<Vec<Network>, ClientError> {
        self.call("list", "networks").await?;
        Ok(self.networks.lock().unwrap().clone())
    }

    async fn list_compose_projects(&self) -> Result<Vec<ComposeProject>, ClientError> {
        self.call("list", "compose").await?;
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn inspect_container_spec(&self, id: &str) -> Result<ContainerSpec, ClientError> {
        self.call("inspect", id).await?;
        self.specs
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound {
                kind: "container",
                id: id.to_string(),
            })
    }

    async fn start_container(&self, id: &str) -> Result<(), ClientError> {
        self.call("start", id).await
    }

    async fn stop_container(&self, id: &str, _grace: Duration) -> Result<(), ClientError> {
        self.call("stop", id).await
    }

    async fn restart_container(&self, id: &str, _grace: Duration) -> Result<(), ClientError> {
        self.call("restart", id).await
    }

    async fn remove_container(&self, id: &str, _force: bool) -> Result<(), ClientError> {
        self.call("remove", id).await
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<String, ClientError> {
        self.call("create", &spec.name).await?;
        Ok(NEW_CONTAINER_ID.to_string())
    }

    async fn attach_network(
        &self,
        network_id: &str,
        container_id: &str,
        _aliases: &[String],
    ) -> Result<(), ClientError> {
        self.call("attach", &format!("{}:{}", network_id, container_id))
            .await
    }

    async fn detach_network(&self, network_id: &str, container_id: &str) -> Result<(), ClientError> {
        self.call("detach", &format!("{}:{}", network_id, container_id))
            .await
    }

    async fn create_network(&self, name: &str, driver: &str) -> Result<(), ClientError> {
        self.call("create_network", &format!("{}:{}", name, driver))
            .await
    }

    async fn remove_network(&self, id: &str) -> Result<(), ClientError> {
        self.call("remove_network", id).await
    }

    async fn remove_image(&self, id: &str, _force: bool) -> Result<(), ClientError> {
        self.call("remove_image", id).await
    }

    async fn pull_image(&self, reference: &str) -> Result<(), ClientError> {
        self.call("pull", reference).await
    }

    async fn remove_volume(&self, name: &str, _force: bool) -> Result<(), ClientError> {
        self.call("remove_volume", name).await
    }

    async fn prune_volumes(&self) -> Result<u64, ClientError> {
        self.call("prune", "volumes").await?;
        Ok(3 * 1024 * 1024)
    }

    fn stream_logs(
        &self,
        id: &str,
        _options: LogOptions,
        _token: CancellationToken,
    ) -> StreamChannels<LogEntry> {
        self.calls.lock().unwrap().push(format!("logs {}", id));
        let (senders, channels) = stream_channels(LOG_CHANNEL_CAPACITY);
        self.log_senders.lock().unwrap().push(senders);
        channels
    }

    fn stream_stats(&self, id: &str, _token: CancellationToken) -> StreamChannels<ContainerStats> {
        self.calls.lock().unwrap().push(format!("stats {}", id));
        let (senders, channels) = stream_channels(STATS_CHANNEL_CAPACITY);
        self.stats_senders.lock().unwrap().push(senders);
        channels
    }
}
