//! In-process bus
//!
//! `LocalBus` keeps, per topic name, the set of subscriptions and their
//! callbacks, and routes every published message to the subscribers whose
//! stream kind matches the message.
//!
//! Concurrency notes:
//! - Publishing holds the registry read lock while callbacks run, so several
//!   publishers deliver in parallel.
//! - `unsubscribe` takes the write lock and therefore waits for in-flight
//!   deliveries. When it returns, the removed callback can no longer fire.
//! - Callbacks must not call back into the same bus.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use super::message::{StreamKind, StreamMessage};
use super::{Callback, SubscriptionHandle, Transport};
use crate::utils::error::TransportError;
use crate::utils::{read, write};

struct Subscriber {
    kind: StreamKind,
    callback: Callback,
}

#[derive(Default)]
struct Topic {
    subscribers: HashMap<SubscriptionHandle, Subscriber>,
}

#[derive(Default)]
struct Registry {
    topics: HashMap<String, Topic>,
    routes: HashMap<SubscriptionHandle, String>,
    closed: bool,
}

#[derive(Default)]
pub struct LocalBus {
    registry: RwLock<Registry>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `msg` to every matching subscriber of `topic`.
    ///
    /// Returns how many callbacks were invoked.
    pub fn publish(&self, topic: &str, msg: StreamMessage) -> usize {
        let registry = read(&self.registry);
        let Some(entry) = registry.topics.get(topic) else {
            debug!("No subscribers on '{topic}'");
            return 0;
        };

        let kind = msg.kind();
        let mut delivered = 0;
        for sub in entry.subscribers.values().filter(|s| s.kind == kind) {
            (sub.callback)(&msg);
            delivered += 1;
        }
        delivered
    }

    /// Number of live subscriptions on `topic`, across all stream kinds.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        read(&self.registry)
            .topics
            .get(topic)
            .map_or(0, |t| t.subscribers.len())
    }

    pub fn subscription_count(&self) -> usize {
        read(&self.registry).routes.len()
    }

    /// Refuse new subscriptions. Existing ones stay live until released.
    pub fn close(&self) {
        write(&self.registry).closed = true;
    }
}

impl Transport for LocalBus {
    fn subscribe(
        &self,
        topic: &str,
        kind: StreamKind,
        callback: Callback,
    ) -> Result<SubscriptionHandle, TransportError> {
        let mut registry = write(&self.registry);
        if registry.closed {
            return Err(TransportError::Closed);
        }

        let handle = SubscriptionHandle::new();
        registry
            .topics
            .entry(topic.to_string())
            .or_default()
            .subscribers
            .insert(handle, Subscriber { kind, callback });
        registry.routes.insert(handle, topic.to_string());

        debug!("Subscribed {} to '{topic}' ({kind:?})", handle.id());
        Ok(handle)
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) -> Result<(), TransportError> {
        let mut registry = write(&self.registry);
        let topic = registry
            .routes
            .remove(&handle)
            .ok_or(TransportError::UnknownSubscription(handle.id()))?;

        let now_empty = match registry.topics.get_mut(&topic) {
            Some(entry) => {
                entry.subscribers.remove(&handle);
                entry.subscribers.is_empty()
            }
            None => false,
        };
        if now_empty {
            registry.topics.remove(&topic);
        }

        debug!("Unsubscribed {} from '{topic}'", handle.id());
        Ok(())
    }
}
