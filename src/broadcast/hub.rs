//! Fan-out hub: registered subscribers each own a bounded queue.

use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::broadcast::events::LiveEvent;

/// Handle for one live subscriber.
///
/// Created on connect, destroyed on disconnect. Dropping the handle closes
/// the queue, which the hub notices on the next publish.
pub struct Subscriber {
    id: Uuid,
    rx: mpsc::Receiver<LiveEvent>,
}

impl Subscriber {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next event, in publish order. `None` once unsubscribed.
    pub async fn recv(&mut self) -> Option<LiveEvent> {
        self.rx.recv().await
    }
}

/// Publishes snapshots to every currently registered subscriber.
///
/// Each subscriber has its own bounded queue; a slow consumer fills its
/// queue and is dropped without delaying delivery to anyone else.
pub struct Broadcaster {
    subscribers: DashMap<Uuid, mpsc::Sender<LiveEvent>>,
    buffer: usize,
}

impl Broadcaster {
    pub fn new(buffer: usize) -> Self {
        Self {
            subscribers: DashMap::new(),
            buffer: buffer.max(1),
        }
    }

    pub fn subscribe(&self) -> Subscriber {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = Uuid::new_v4();
        self.subscribers.insert(id, tx);
        tracing::debug!(subscriber = %id, total = self.subscribers.len(), "Subscriber registered");
        Subscriber { id, rx }
    }

    /// Deliver `event` to all subscribers. Never blocks; per-subscriber
    /// failures unsubscribe that subscriber and are invisible to the caller.
    pub fn publish(&self, event: LiveEvent) {
        let mut dropped = Vec::new();
        for entry in self.subscribers.iter() {
            match entry.value().try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(subscriber = %entry.key(), "Subscriber queue full, dropping subscriber");
                    dropped.push(*entry.key());
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    dropped.push(*entry.key());
                }
            }
        }
        // Removal happens outside the iteration to avoid holding shard
        // locks while mutating.
        for id in dropped {
            self.unsubscribe(&id);
        }
    }

    /// Remove a subscriber. Calling twice for the same id is a no-op.
    pub fn unsubscribe(&self, id: &Uuid) {
        if self.subscribers.remove(id).is_some() {
            tracing::debug!(subscriber = %id, total = self.subscribers.len(), "Subscriber removed");
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
