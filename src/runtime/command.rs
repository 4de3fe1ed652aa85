use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Deferred work producing at most one event
pub struct Command<E> {
    label: &'static str,
    future: BoxFuture<'static, Option<E>>,
    cancellable: bool,
}

impl<E: Send + 'static> Command<E> {
    pub fn new<F>(label: &'static str, future: F) -> Self
    where
        F: Future<Output = Option<E>> + Send + 'static,
    {
        Self {
            label,
            future: future.boxed(),
            cancellable: true,
        }
    }

    /// Keep running through shutdown. The future must bound itself with its
    /// own deadline; the scheduler waits for it.
    pub fn to_completion(mut self) -> Self {
        self.cancellable = false;
        self
    }

    pub fn is_cancellable(&self) -> bool {
        self.cancellable
    }

    /// Emit `event` immediately
    pub fn ready(label: &'static str, event: E) -> Self {
        Self::new(label, async move { Some(event) })
    }

    /// Emit `event` once `delay` has elapsed
    pub fn after(label: &'static str, delay: Duration, event: E) -> Self {
        Self::new(label, async move {
            tokio::time::sleep(delay).await;
            Some(event)
        })
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub async fn run(self) -> Option<E> {
        self.future.await
    }
}

impl<E> std::fmt::Debug for Command<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("label", &self.label)
            .field("cancellable", &self.cancellable)
            .finish()
    }
}

/// Runs commands on the tokio runtime and feeds their events back
pub struct Scheduler<E> {
    events: mpsc::UnboundedSender<E>,
    token: CancellationToken,
    tracker: TaskTracker,
}

impl<E: Send + 'static> Scheduler<E> {
    pub fn new(events: mpsc::UnboundedSender<E>) -> Self {
        Self {
            events,
            token: CancellationToken::new(),
            tracker: TaskTracker::new(),
        }
    }

    /// Root token; subscriptions derive child tokens from it
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn spawn(&self, command: Command<E>) {
        let label = command.label();
        let events = self.events.clone();
        let token = self.token.clone();

        self.tracker.spawn(async move {
            let event = if command.is_cancellable() {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!(command = label, "command cancelled");
                        return;
                    }
                    event = command.run() => event,
                }
            } else {
                command.run().await
            };
            if let Some(event) = event {
                // Receiver is gone during shutdown
                let _ = events.send(event);
            }
        });
    }

    pub fn spawn_all(&self, commands: impl IntoIterator<Item = Command<E>>) {
        for command in commands {
            self.spawn(command);
        }
    }

    /// Number of commands still running
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Cancel outstanding commands and wait for every task to return.
    /// Commands marked [`Command::to_completion`] finish and still send
    /// their event.
    pub async fn shutdown(&self) {
        if !self.tracker.is_empty() {
            tracing::debug!(in_flight = self.tracker.len(), "waiting for commands");
        }
        self.token.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_none_is_dropped() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u32>();
        let scheduler = Scheduler::new(tx);
        scheduler.spawn(Command::new("noop", async { None }));
        scheduler.spawn(Command::ready("one", 1));
        scheduler.shutdown().await;

        assert_eq!(rx.recv().await, Some(1));
        drop(scheduler);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_commands() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u32>();
        let scheduler = Scheduler::new(tx);
        scheduler.spawn(Command::after("late", Duration::from_secs(60), 7));
        assert_eq!(scheduler.in_flight(), 1);

        scheduler.shutdown().await;
        assert_eq!(scheduler.in_flight(), 0);
        drop(scheduler);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_waits_for_commands_run_to_completion() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u32>();
        let scheduler = Scheduler::new(tx);
        scheduler.spawn(Command::after("workflow", Duration::from_secs(5), 9).to_completion());
        scheduler.spawn(Command::after("tick", Duration::from_secs(5), 1));

        scheduler.shutdown().await;
        assert_eq!(rx.recv().await, Some(9));
        drop(scheduler);
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_after_waits_for_delay() {
        let start = tokio::time::Instant::now();
        let event = Command::after("tick", Duration::from_secs(2), "tick").run().await;
        assert_eq!(event, Some("tick"));
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
