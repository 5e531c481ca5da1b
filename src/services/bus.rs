use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{
    mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    RwLock,
};
use uuid::Uuid;

use crate::models::MessageCreated;

/// Topic newly persisted messages are announced on.
pub const MESSAGE_CREATED: &str = "message.created";

/// Unique identifier for a bus subscriber, used for precise cleanup when a
/// connection closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

struct Subscriber {
    id: SubscriberId,
    sender: UnboundedSender<MessageCreated>,
}

/// Process-wide publish/subscribe channel for created-message events.
///
/// Constructed once at startup and injected through `AppState`; never reached
/// through a global. Every subscriber owns an independent unbounded channel,
/// so a slow consumer buffers on its own channel and can never stall the
/// publisher or its peers. Events published before a subscribe call are never
/// replayed.
#[derive(Default, Clone)]
pub struct MessageBus {
    // topic -> list of subscribers
    inner: Arc<RwLock<HashMap<String, Vec<Subscriber>>>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber on `topic`.
    ///
    /// Returns the subscriber id (for explicit removal) and the receiving end
    /// of a fresh channel carrying every event published from now on.
    pub async fn subscribe(
        &self,
        topic: &str,
    ) -> (SubscriberId, UnboundedReceiver<MessageCreated>) {
        let (tx, rx) = unbounded_channel();
        let subscriber_id = SubscriberId::new();

        let mut guard = self.inner.write().await;
        guard.entry(topic.to_string()).or_default().push(Subscriber {
            id: subscriber_id,
            sender: tx,
        });

        tracing::debug!(
            ?subscriber_id,
            topic,
            total = guard.get(topic).map(|v| v.len()).unwrap_or(0),
            "bus subscriber added"
        );

        (subscriber_id, rx)
    }

    /// Remove a specific subscriber. Must be called when a connection closes;
    /// dropped receivers are additionally pruned on the next publish.
    pub async fn remove_subscriber(&self, topic: &str, subscriber_id: SubscriberId) {
        let mut guard = self.inner.write().await;

        if let Some(subscribers) = guard.get_mut(topic) {
            subscribers.retain(|s| s.id != subscriber_id);
            if subscribers.is_empty() {
                guard.remove(topic);
            }
            tracing::debug!(?subscriber_id, topic, "bus subscriber removed");
        }
    }

    /// Deliver `event` to every live subscriber of `topic`.
    ///
    /// Never blocks on consumers. Senders whose receiver is gone are pruned
    /// in place; with unbounded channels a send only fails when the other
    /// side hung up.
    pub async fn publish(&self, topic: &str, event: MessageCreated) {
        let mut guard = self.inner.write().await;

        if let Some(subscribers) = guard.get_mut(topic) {
            let before = subscribers.len();
            subscribers.retain(|subscriber| subscriber.sender.send(event.clone()).is_ok());
            let after = subscribers.len();

            if before != after {
                tracing::debug!(
                    topic,
                    pruned = before - after,
                    active = after,
                    "pruned dead bus subscribers during publish"
                );
            }
        }
    }

    /// Subscriber count for a topic (diagnostics and tests).
    pub async fn subscriber_count(&self, topic: &str) -> usize {
        let guard = self.inner.read().await;
        guard.get(topic).map(|v| v.len()).unwrap_or(0)
    }
}
