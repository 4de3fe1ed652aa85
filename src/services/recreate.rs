//! Stop, remove, create, reconnect and start a container with a new spec

use crate::docker::{ClientError, ResourceClient};
use crate::models::{ContainerSpec, short_id};
use std::fmt;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecreateStep {
    Stopping,
    Removing,
    Creating,
    Attaching,
    Starting,
    Done,
}

impl fmt::Display for RecreateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecreateStep::Stopping => "stopping",
            RecreateStep::Removing => "removing",
            RecreateStep::Creating => "creating",
            RecreateStep::Attaching => "attaching networks",
            RecreateStep::Starting => "starting",
            RecreateStep::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("recreate failed while {step}: {source}")]
pub struct RecreateError {
    pub step: RecreateStep,
    #[source]
    pub source: ClientError,
}

#[derive(Debug)]
pub struct RecreateOutcome {
    /// Set as soon as the replacement exists, even if a later step failed
    pub new_id: Option<String>,
    /// Steps entered, in order
    pub steps: Vec<RecreateStep>,
    pub result: Result<(), RecreateError>,
}

impl RecreateOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    fn abort(mut self, step: RecreateStep, source: ClientError) -> Self {
        tracing::warn!(%step, "recreate aborted: {}", source);
        self.result = Err(RecreateError { step, source });
        self
    }
}

async fn bounded<T>(
    deadline: Instant,
    step: RecreateStep,
    fut: impl Future<Output = Result<T, ClientError>>,
) -> Result<T, ClientError> {
    let budget = deadline.saturating_duration_since(Instant::now());
    match tokio::time::timeout_at(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::timeout(format!("recreate ({})", step), budget)),
    }
}

/// Replace container `id` with one built from `spec`.
///
/// A failed stop is ignored (the container may already be stopped) and so
/// are failed secondary network attachments. Remove, create and start
/// failures abort. Only the spec's first network is attached at creation.
pub async fn recreate(
    client: &dyn ResourceClient,
    id: &str,
    spec: &ContainerSpec,
    deadline: Instant,
    grace: Duration,
) -> RecreateOutcome {
    let mut outcome = RecreateOutcome {
        new_id: None,
        steps: Vec::new(),
        result: Ok(()),
    };
    let container = short_id(id);

    outcome.steps.push(RecreateStep::Stopping);
    tracing::debug!(container, "recreate: stopping");
    if let Err(e) = bounded(
        deadline,
        RecreateStep::Stopping,
        client.stop_container(id, grace),
    )
    .await
    {
        tracing::debug!(container, "stop failed, continuing: {}", e);
    }

    outcome.steps.push(RecreateStep::Removing);
    tracing::debug!(container, "recreate: removing");
    if let Err(e) = bounded(
        deadline,
        RecreateStep::Removing,
        client.remove_container(id, true),
    )
    .await
    {
        return outcome.abort(RecreateStep::Removing, e);
    }

    outcome.steps.push(RecreateStep::Creating);
    tracing::debug!(container, name = %spec.name, "recreate: creating");
    let new_id = match bounded(deadline, RecreateStep::Creating, client.create_container(spec)).await
    {
        Ok(new_id) => new_id,
        Err(e) => return outcome.abort(RecreateStep::Creating, e),
    };
    outcome.new_id = Some(new_id.clone());

    if !spec.secondary_networks().is_empty() {
        outcome.steps.push(RecreateStep::Attaching);
        for network in spec.secondary_networks() {
            let target = if network.network_id.is_empty() {
                &network.name
            } else {
                &network.network_id
            };
            tracing::debug!(container, network = %network.name, "recreate: attaching");
            if let Err(e) = bounded(
                deadline,
                RecreateStep::Attaching,
                client.attach_network(target, &new_id, &network.aliases),
            )
            .await
            {
                tracing::warn!(network = %network.name, "failed to attach network: {}", e);
            }
        }
    }

    outcome.steps.push(RecreateStep::Starting);
    tracing::debug!(container = short_id(&new_id), "recreate: starting");
    if let Err(e) = bounded(deadline, RecreateStep::Starting, client.start_container(&new_id)).await
    {
        return outcome.abort(RecreateStep::Starting, e);
    }

    outcome.steps.push(RecreateStep::Done);
    tracing::info!(
        old = container,
        new = short_id(&new_id),
        "container recreated"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docker::MockResourceClient;
    use crate::models::NetworkAttachment;
    use mockall::Sequence;
    use mockall::predicate::eq;

    fn spec_with_networks(names: &[&str]) -> ContainerSpec {
        ContainerSpec {
            name: "api".into(),
            image: "api:latest".into(),
            networks: names
                .iter()
                .map(|n| NetworkAttachment {
                    name: n.to_string(),
                    network_id: format!("{}-id", n),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(60)
    }

    #[tokio::test]
    async fn test_happy_path_runs_steps_in_order() {
        let mut client = MockResourceClient::new();
        let mut seq = Sequence::new();
        client
            .expect_stop_container()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        client
            .expect_remove_container()
            .with(eq("old"), eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        client
            .expect_create_container()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("new".to_string()));
        client
            .expect_attach_network()
            .withf(|net, id, _| net == "back-id" && id == "new")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        client
            .expect_start_container()
            .with(eq("new"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let spec = spec_with_networks(&["front", "back"]);
        let outcome = recreate(&client, "old", &spec, deadline(), Duration::from_secs(1)).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.new_id.as_deref(), Some("new"));
        assert_eq!(
            outcome.steps,
            vec![
                RecreateStep::Stopping,
                RecreateStep::Removing,
                RecreateStep::Creating,
                RecreateStep::Attaching,
                RecreateStep::Starting,
                RecreateStep::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_remove_failure_aborts_before_create() {
        let mut client = MockResourceClient::new();
        client.expect_stop_container().returning(|_, _| Ok(()));
        client.expect_remove_container().returning(|id, _| {
            Err(ClientError::NotFound {
                kind: "container",
                id: id.to_string(),
            })
        });
        client.expect_create_container().never();

        let outcome = recreate(
            &client,
            "old",
            &spec_with_networks(&[]),
            deadline(),
            Duration::from_secs(1),
        )
        .await;

        assert!(outcome.new_id.is_none());
        let err = outcome.result.unwrap_err();
        assert_eq!(err.step, RecreateStep::Removing);
        insta::assert_snapshot!(err.to_string(), @"recreate failed while removing: container not found: old");
    }

    #[tokio::test]
    async fn test_attach_failure_is_not_fatal() {
        let mut client = MockResourceClient::new();
        client.expect_stop_container().returning(|_, _| Ok(()));
        client.expect_remove_container().returning(|_, _| Ok(()));
        client
            .expect_create_container()
            .returning(|_| Ok("new".to_string()));
        client
            .expect_attach_network()
            .times(2)
            .returning(|_, _, _| Err(ClientError::Stream("network gone".into())));
        client.expect_start_container().times(1).returning(|_| Ok(()));

        let spec = spec_with_networks(&["a", "b", "c"]);
        let outcome = recreate(&client, "old", &spec, deadline(), Duration::from_secs(1)).await;
        assert!(outcome.is_success());
    }
}
