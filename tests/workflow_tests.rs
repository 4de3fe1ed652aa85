//! Tests for group batch operations and the recreate workflow

mod common;

use common::{FakeClient, NEW_CONTAINER_ID};
use dockhand::docker::ResourceClient;
use dockhand::models::{ContainerSpec, NetworkAttachment};
use dockhand::services::{RecreateStep, recreate, run_batch};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn deadline(secs: u64) -> Instant {
    Instant::now() + Duration::from_secs(secs)
}

fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_batch_runs_every_id() {
    let client = Arc::new(FakeClient::new());
    let report = run_batch(ids(&["a", "b", "c"]), deadline(5), |id| {
        let client = Arc::clone(&client);
        async move { client.start_container(&id).await }
    })
    .await;

    assert!(report.is_success());
    assert_eq!(report.succeeded, vec!["a", "b", "c"]);
    let mut calls = client.calls();
    calls.sort();
    assert_eq!(calls, vec!["start a", "start b", "start c"]);
}

#[tokio::test]
async fn test_batch_failure_does_not_stop_the_others() {
    let client = Arc::new(FakeClient::new());
    client.fail("b");
    let report = run_batch(ids(&["a", "b", "c"]), deadline(5), |id| {
        let client = Arc::clone(&client);
        async move { client.stop_container(&id, Duration::from_secs(1)).await }
    })
    .await;

    assert_eq!(report.total(), 3);
    assert_eq!(report.succeeded, vec!["a", "c"]);
    let err = report.into_result().unwrap_err();
    assert_eq!(err.failed_ids(), vec!["b"]);
    insta::assert_snapshot!(err.to_string(), @"group operation failed: [b: stream error: stop b refused]");
}

#[tokio::test]
async fn test_batch_deadline_bounds_slow_members() {
    let client = Arc::new(FakeClient::new());
    client.hang("slow");
    let started = Instant::now();
    let report = run_batch(
        ids(&["fast", "slow"]),
        Instant::now() + Duration::from_millis(100),
        |id| {
            let client = Arc::clone(&client);
            async move { client.start_container(&id).await }
        },
    )
    .await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(report.succeeded, vec!["fast"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "slow");
    assert!(report.failed[0].1.contains("timed out"));
}

#[tokio::test]
async fn test_empty_batch_is_a_success() {
    let report = run_batch(Vec::new(), deadline(1), |_id| async { Ok(()) }).await;
    assert_eq!(report.total(), 0);
    assert!(report.into_result().is_ok());
}

fn spec() -> ContainerSpec {
    ContainerSpec {
        name: "api".into(),
        image: "api:latest".into(),
        env: vec!["MODE=prod".into()],
        networks: ["front", "back", "metrics"]
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

#[tokio::test]
async fn test_recreate_reattaches_secondary_networks() {
    let client = FakeClient::new();
    let outcome = recreate(&client, "old", &spec(), deadline(5), Duration::from_secs(1)).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.new_id.as_deref(), Some(NEW_CONTAINER_ID));
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
    assert_eq!(
        client.calls(),
        vec![
            "stop old".to_string(),
            "remove old".to_string(),
            "create api".to_string(),
            format!("attach back-id:{}", NEW_CONTAINER_ID),
            format!("attach metrics-id:{}", NEW_CONTAINER_ID),
            format!("start {}", NEW_CONTAINER_ID),
        ]
    );
}

#[tokio::test]
async fn test_recreate_ignores_stop_failure() {
    let client = FakeClient::new();
    client.fail("stop");
    let outcome = recreate(&client, "old", &spec(), deadline(5), Duration::from_secs(1)).await;
    assert!(outcome.is_success());
}

#[tokio::test]
async fn test_recreate_aborts_when_remove_fails() {
    let client = FakeClient::new();
    client.fail("remove");
    let outcome = recreate(&client, "old", &spec(), deadline(5), Duration::from_secs(1)).await;

    assert!(outcome.new_id.is_none());
    let err = outcome.result.unwrap_err();
    assert_eq!(err.step, RecreateStep::Removing);
    assert!(client.calls_starting_with("create").is_empty());
}

#[tokio::test]
async fn test_recreate_reports_new_id_when_start_fails() {
    let client = FakeClient::new();
    client.fail("start");
    let outcome = recreate(&client, "old", &spec(), deadline(5), Duration::from_secs(1)).await;

    assert_eq!(outcome.new_id.as_deref(), Some(NEW_CONTAINER_ID));
    let err = outcome.result.unwrap_err();
    assert_eq!(err.step, RecreateStep::Starting);
    assert!(err.to_string().starts_with("recreate failed while starting:"));
}

#[tokio::test]
async fn test_recreate_tolerates_attach_failure() {
    let client = FakeClient::new();
    client.fail("attach");
    let outcome = recreate(&client, "old", &spec(), deadline(5), Duration::from_secs(1)).await;
    assert!(outcome.is_success());
    assert_eq!(client.calls_starting_with("attach").len(), 2);
}
