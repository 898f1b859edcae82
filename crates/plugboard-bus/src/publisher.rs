//! # Event Publisher
//!
//! The bus itself: a broadcast channel wrapped as a hosted component.
//! Publishing is synchronous and never blocks, so the lifecycle manager can
//! raise events while it holds its structural lock.

use crate::events::{EventFilter, HostEvent};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use plugboard_types::{Component, ComponentFactory, EVENT_BUS};
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// In-process event bus component.
///
/// Built on `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics. Suitable for single-process operation; each subscriber gets
/// its own bounded buffer and lags independently.
pub struct EventBus {
    /// Broadcast sender for events.
    sender: broadcast::Sender<HostEvent>,

    /// Active subscription count by topic key.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Total events published.
    events_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl EventBus {
    /// Create a bus with the default per-subscriber capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a bus with the given per-subscriber capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Publish an event to every current subscriber.
    ///
    /// Returns the number of subscribers that received it. An event with no
    /// subscribers is dropped; that is normal during early bootstrap.
    pub fn publish(&self, event: HostEvent) -> usize {
        let topic = event.topic();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(topic = ?topic, receivers = receiver_count, "event published");
                receiver_count
            }
            Err(_) => {
                debug!(topic = ?topic, "event dropped (no subscribers)");
                0
            }
        }
    }

    /// Subscribe to events matching `filter`.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let topic_key = filter.topic_key();

        if let Ok(mut subs) = self.subscriptions.write() {
            *subs.entry(topic_key.clone()).or_insert(0) += 1;
        }

        debug!(topics = %topic_key, "new subscription created");
        Subscription::new(receiver, filter, self.subscriptions.clone(), topic_key)
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Per-subscriber channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total events published since construction.
    #[must_use]
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for EventBus {
    fn name(&self) -> &'static str {
        EVENT_BUS
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Factory for hosting the bus as a component. The capacity is captured at
/// factory-build time so configuration happens before bootstrap.
#[must_use]
pub fn event_bus_factory(capacity: usize) -> ComponentFactory {
    ComponentFactory::new(EVENT_BUS, move |_ctx| {
        if capacity == 0 {
            warn!("event bus capacity 0 requested, using default");
            return Some(Arc::new(EventBus::new()));
        }
        Some(Arc::new(EventBus::with_capacity(capacity)))
    })
}
