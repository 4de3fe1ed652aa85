//! Tests for command scheduling and stream subscriptions

mod common;

use common::{FakeClient, container};
use dockhand::docker::{ClientError, stream_channels};
use dockhand::models::ContainerSpec;
use dockhand::runtime::{Command, Scheduler, Subscription, SubscriptionId, SubscriptionIds};
use dockhand::services::{RecreateOutcome, RecreateStep, recreate};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, PartialEq)]
enum TestEvent {
    Item(SubscriptionId, u32),
    Failed(SubscriptionId, String),
}

fn open(rx: dockhand::docker::StreamChannels<u32>, token: CancellationToken) -> Subscription<u32> {
    Subscription::open(SubscriptionIds::default().next(), rx, token)
}

fn next(sub: &Subscription<u32>) -> Command<TestEvent> {
    sub.next_command(TestEvent::Item, |id, err| {
        TestEvent::Failed(id, err.to_string())
    })
}

#[tokio::test]
async fn test_each_command_delivers_one_item() {
    let (tx, rx) = stream_channels::<u32>(8);
    let sub = open(rx, CancellationToken::new());
    for n in 0..3 {
        tx.data.send(n).await.unwrap();
    }

    assert_eq!(next(&sub).run().await, Some(TestEvent::Item(sub.id(), 0)));
    assert_eq!(next(&sub).run().await, Some(TestEvent::Item(sub.id(), 1)));
    assert_eq!(next(&sub).run().await, Some(TestEvent::Item(sub.id(), 2)));
}

#[tokio::test]
async fn test_cancel_stops_delivery_even_with_buffered_data() {
    let (tx, rx) = stream_channels::<u32>(8);
    let sub = open(rx, CancellationToken::new());
    tx.data.send(1).await.unwrap();
    tx.data.send(2).await.unwrap();

    sub.cancel();
    assert!(sub.is_cancelled());
    assert_eq!(next(&sub).run().await, None);
}

#[tokio::test]
async fn test_cancel_wakes_a_pending_receive() {
    let (_tx, rx) = stream_channels::<u32>(8);
    let sub = open(rx, CancellationToken::new());
    let pending = tokio::spawn(next(&sub).run());

    tokio::time::sleep(Duration::from_millis(20)).await;
    sub.cancel();

    let result = tokio::time::timeout(Duration::from_secs(1), pending)
        .await
        .expect("receive should return after cancel")
        .unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
async fn test_error_is_mapped_with_subscription_id() {
    let (tx, rx) = stream_channels::<u32>(8);
    let sub = open(rx, CancellationToken::new());
    tx.errors
        .send(ClientError::Stream("daemon went away".into()))
        .await
        .unwrap();

    assert_eq!(
        next(&sub).run().await,
        Some(TestEvent::Failed(
            sub.id(),
            "stream error: daemon went away".to_string()
        ))
    );
}

#[tokio::test]
async fn test_parent_token_cancels_child_subscription() {
    let parent = CancellationToken::new();
    let (tx, rx) = stream_channels::<u32>(8);
    let sub = open(rx, parent.child_token());
    tx.data.send(7).await.unwrap();

    parent.cancel();
    assert!(sub.is_cancelled());
    assert_eq!(next(&sub).run().await, None);
}

#[test]
fn test_subscription_ids_are_unique() {
    let mut ids = SubscriptionIds::default();
    let a = ids.next();
    let b = ids.next();
    assert_ne!(a, b);
    assert!(a.to_string().starts_with("sub-"));
}

#[tokio::test]
async fn test_scheduler_forwards_events_in_completion_order() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let scheduler = Scheduler::new(tx);
    scheduler.spawn(Command::after("slow", Duration::from_millis(50), "slow"));
    scheduler.spawn(Command::ready("fast", "fast"));

    assert_eq!(rx.recv().await, Some("fast"));
    assert_eq!(rx.recv().await, Some("slow"));
    scheduler.shutdown().await;
}

#[tokio::test]
async fn test_scheduler_shutdown_drops_unfinished_commands() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let scheduler = Scheduler::new(tx);
    scheduler.spawn(Command::after("never", Duration::from_secs(60), 1u32));
    assert_eq!(scheduler.in_flight(), 1);

    tokio::time::timeout(Duration::from_secs(1), scheduler.shutdown())
        .await
        .expect("shutdown should not wait for cancelled work");
    assert_eq!(scheduler.in_flight(), 0);
    drop(scheduler);
    assert_eq!(rx.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_shutdown_lets_recreate_finish() {
    let client = Arc::new(FakeClient::with_containers(vec![container(
        "old",
        "api",
        "running",
    )]));
    client.hang("api");
    let spec = ContainerSpec {
        name: "api".into(),
        image: "api:2".into(),
        ..Default::default()
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<RecreateOutcome>();
    let scheduler = Scheduler::new(tx);
    let worker = Arc::clone(&client);
    scheduler.spawn(
        Command::new("recreate container", async move {
            let deadline = Instant::now() + Duration::from_secs(30);
            Some(recreate(&*worker, "old", &spec, deadline, Duration::from_secs(1)).await)
        })
        .to_completion(),
    );
    tokio::task::yield_now().await;

    tokio::time::timeout(Duration::from_secs(60), scheduler.shutdown())
        .await
        .expect("recreate is bounded by its own deadline");

    let outcome = rx.recv().await.expect("outcome is delivered after shutdown");
    assert_eq!(client.calls(), vec!["stop old", "remove old", "create api"]);
    assert_eq!(outcome.new_id, None);
    assert_eq!(outcome.result.unwrap_err().step, RecreateStep::Creating);
    drop(scheduler);
    assert!(rx.recv().await.is_none());
}
