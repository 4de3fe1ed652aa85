//! Docker Engine client
//!
//! Everything the application does against the daemon goes through the
//! [`ResourceClient`] trait so that the reducer, the batch executor and the
//! recreate workflow can be exercised against mocks. [`DockerClient`] is the
//! production implementation backed by `bollard`.
//!
//! Streaming calls (logs, stats) return a [`StreamChannels`] pair: a bounded
//! data receiver and a one-slot error receiver. The producer task owns both
//! senders and drops them when the stream ends or its token is cancelled.

pub mod client;
pub mod convert;

use crate::models::{
    ComposeProject, Container, ContainerSpec, ContainerStats, Image, LogEntry, Network, Volume,
};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub use client::DockerClient;

/// Capacity of the log record channel
pub const LOG_CHANNEL_CAPACITY: usize = 100;
/// Capacity of the stats sample channel
pub const STATS_CHANNEL_CAPACITY: usize = 10;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Docker(#[from] bollard::errors::Error),

    #[error("{operation} timed out after {}s", .after.as_secs())]
    Timeout {
        operation: String,
        after: Duration,
    },

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("stream error: {0}")]
    Stream(String),
}

impl ClientError {
    pub fn timeout(operation: impl Into<String>, after: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            after,
        }
    }
}

/// Receiving half of a live stream
#[derive(Debug)]
pub struct StreamChannels<T> {
    pub data: mpsc::Receiver<T>,
    pub errors: mpsc::Receiver<ClientError>,
}

/// Sending half handed to a stream producer
#[derive(Debug, Clone)]
pub struct StreamSenders<T> {
    pub data: mpsc::Sender<T>,
    pub errors: mpsc::Sender<ClientError>,
}

/// Create a connected sender/receiver pair with the given data capacity.
/// The error channel always holds a single item.
pub fn stream_channels<T>(capacity: usize) -> (StreamSenders<T>, StreamChannels<T>) {
    let (data_tx, data_rx) = mpsc::channel(capacity.max(1));
    let (err_tx, err_rx) = mpsc::channel(1);
    (
        StreamSenders {
            data: data_tx,
            errors: err_tx,
        },
        StreamChannels {
            data: data_rx,
            errors: err_rx,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub follow: bool,
    /// Number of trailing lines, or "all"
    pub tail: String,
    /// Unix seconds, 0 for no lower bound
    pub since: i64,
    pub timestamps: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            follow: true,
            tail: "100".to_string(),
            since: 0,
            timestamps: true,
        }
    }
}

/// Per-call deadlines applied by [`DockerClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub list: Duration,
    pub operation: Duration,
    pub remove: Duration,
    pub pull: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            list: Duration::from_secs(5),
            operation: Duration::from_secs(10),
            remove: Duration::from_secs(30),
            pull: Duration::from_secs(120),
        }
    }
}

/// Operations the UI performs against the container daemon
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Verify the daemon is reachable
    async fn ping(&self) -> Result<(), ClientError>;

    async fn list_containers(&self) -> Result<Vec<Container>, ClientError>;
    async fn list_images(&self) -> Result<Vec<Image>, ClientError>;
    async fn list_volumes(&self) -> Result<Vec<Volume>, ClientError>;
    async fn list_networks(&self) -> Result<Vec<Network>, ClientError>;
    async fn list_compose_projects(&self) -> Result<Vec<ComposeProject>, ClientError>;

    /// Full configuration needed to recreate a container
    async fn inspect_container_spec(&self, id: &str) -> Result<ContainerSpec, ClientError>;

    async fn start_container(&self, id: &str) -> Result<(), ClientError>;
    async fn stop_container(&self, id: &str, grace: Duration) -> Result<(), ClientError>;
    async fn restart_container(&self, id: &str, grace: Duration) -> Result<(), ClientError>;
    async fn remove_container(&self, id: &str, force: bool) -> Result<(), ClientError>;

    /// Create a container attached to the spec's first network only.
    /// Returns the new container id.
    async fn create_container(&self, spec: &ContainerSpec) -> Result<String, ClientError>;

    async fn attach_network(
        &self,
        network_id: &str,
        container_id: &str,
        aliases: &[String],
    ) -> Result<(), ClientError>;
    async fn detach_network(
        &self,
        network_id: &str,
        container_id: &str,
    ) -> Result<(), ClientError>;
    async fn create_network(&self, name: &str, driver: &str) -> Result<(), ClientError>;
    async fn remove_network(&self, id: &str) -> Result<(), ClientError>;

    async fn remove_image(&self, id: &str, force: bool) -> Result<(), ClientError>;
    async fn pull_image(&self, reference: &str) -> Result<(), ClientError>;

    async fn remove_volume(&self, name: &str, force: bool) -> Result<(), ClientError>;
    /// Remove unused volumes, returning reclaimed bytes
    async fn prune_volumes(&self) -> Result<u64, ClientError>;

    fn stream_logs(
        &self,
        id: &str,
        options: LogOptions,
        token: CancellationToken,
    ) -> StreamChannels<LogEntry>;

    fn stream_stats(&self, id: &str, token: CancellationToken) -> StreamChannels<ContainerStats>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ClientError::timeout("list containers", Duration::from_secs(5));
        insta::assert_snapshot!(err.to_string(), @"list containers timed out after 5s");

        let err = ClientError::NotFound {
            kind: "container",
            id: "abc".to_string(),
        };
        insta::assert_snapshot!(err.to_string(), @"container not found: abc");
    }

    #[tokio::test]
    async fn test_stream_channels_error_slot_is_single() {
        let (tx, mut rx) = stream_channels::<u8>(0);
        tx.errors
            .try_send(ClientError::Stream("first".into()))
            .unwrap();
        assert!(tx.errors.try_send(ClientError::Stream("second".into())).is_err());
        // zero capacity is bumped to one
        tx.data.try_send(1).unwrap();
        assert_eq!(rx.data.recv().await, Some(1));
        assert!(rx.errors.recv().await.is_some());
    }
}
