use super::Command;
use crate::docker::{ClientError, StreamChannels};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Identifies a subscription so that events from a torn-down stream can be
/// told apart from the live one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Hands out subscription ids. The owner of the streams keeps one.
#[derive(Debug, Default)]
pub struct SubscriptionIds {
    last: u64,
}

impl SubscriptionIds {
    pub fn next(&mut self) -> SubscriptionId {
        self.last += 1;
        SubscriptionId(self.last)
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// One receive from a subscription
#[derive(Debug)]
pub enum Delivery<T> {
    Item(T),
    Failed(ClientError),
}

struct Receivers<T> {
    channels: StreamChannels<T>,
    errors_closed: bool,
}

/// Bridges a producer's channels into a sequence of single-event commands
pub struct Subscription<T> {
    id: SubscriptionId,
    receivers: Arc<Mutex<Receivers<T>>>,
    token: CancellationToken,
}

impl<T> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            receivers: Arc::clone(&self.receivers),
            token: self.token.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

impl<T: Send + 'static> Subscription<T> {
    /// Wrap the channels of a producer that watches `token`
    pub fn open(id: SubscriptionId, channels: StreamChannels<T>, token: CancellationToken) -> Self {
        Self {
            id,
            receivers: Arc::new(Mutex::new(Receivers {
                channels,
                errors_closed: false,
            })),
            token,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Stop the producer. Pending and future receives yield nothing.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait for exactly one item or error.
    ///
    /// Returns `None` once cancelled or once the producer has closed both
    /// channels. Buffered data is drained before a closed stream reports
    /// its end.
    pub async fn next(&self) -> Option<Delivery<T>> {
        if self.token.is_cancelled() {
            return None;
        }
        let mut guard = self.receivers.lock().await;
        let receivers = &mut *guard;

        loop {
            if receivers.errors_closed {
                return tokio::select! {
                    biased;
                    _ = self.token.cancelled() => None,
                    item = receivers.channels.data.recv() => item.map(Delivery::Item),
                };
            }

            tokio::select! {
                biased;
                _ = self.token.cancelled() => return None,
                item = receivers.channels.data.recv() => {
                    return match item {
                        Some(item) => Some(Delivery::Item(item)),
                        // Producer finished; an error may still be queued
                        None => receivers.channels.errors.try_recv().ok().map(Delivery::Failed),
                    };
                }
                err = receivers.channels.errors.recv() => match err {
                    Some(err) => return Some(Delivery::Failed(err)),
                    None => receivers.errors_closed = true,
                },
            }
        }
    }

    /// The single re-arm command for this subscription. Items and errors are
    /// mapped into the caller's event type; a finished or cancelled stream
    /// produces no event.
    pub fn next_command<E, FI, FE>(&self, map_item: FI, map_error: FE) -> Command<E>
    where
        E: Send + 'static,
        FI: FnOnce(SubscriptionId, T) -> E + Send + 'static,
        FE: FnOnce(SubscriptionId, ClientError) -> E + Send + 'static,
    {
        let subscription = self.clone();
        Command::new("subscription next", async move {
            let id = subscription.id;
            match subscription.next().await? {
                Delivery::Item(item) => Some(map_item(id, item)),
                Delivery::Failed(err) => Some(map_error(id, err)),
            }
        })
    }
}
