//! # Event Subscriber
//!
//! Subscription handles for receiving bus events. A subscription can be
//! drained asynchronously (`recv`), non-blockingly (`try_recv`), or from a
//! plain thread (`blocking_recv`); all three apply the subscription's
//! filter and skip over lag gaps.

use crate::events::{EventFilter, HostEvent};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was dropped.
    #[error("event bus closed")]
    Closed,
}

/// A handle for receiving events that match a filter.
///
/// Dropping the subscription unregisters it from the bus accounting.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<HostEvent>,

    /// Filter for this subscription.
    filter: EventFilter,

    /// Reference to subscription tracking (for cleanup on drop).
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Topic key this subscription is accounted under.
    topic_key: String,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<HostEvent>,
        filter: EventFilter,
        subscriptions: Arc<RwLock<HashMap<String, usize>>>,
        topic_key: String,
    ) -> Self {
        Self {
            receiver,
            filter,
            subscriptions,
            topic_key,
        }
    }

    /// Receive the next matching event, or `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<HostEvent> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "subscriber lagged, events dropped");
                    continue;
                }
            };
            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }

    /// Receive the next matching event without waiting.
    ///
    /// `Ok(None)` means no matching event is currently buffered.
    pub fn try_recv(&mut self) -> Result<Option<HostEvent>, SubscriptionError> {
        loop {
            let event = match self.receiver.try_recv() {
                Ok(event) => event,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    debug!(lagged = count, "subscriber lagged, events dropped");
                    continue;
                }
            };
            if self.filter.matches(&event) {
                return Ok(Some(event));
            }
        }
    }

    /// Receive the next matching event from a non-async thread, or `None`
    /// once the bus is gone.
    pub fn blocking_recv(&mut self) -> Option<HostEvent> {
        loop {
            let event = match self.receiver.blocking_recv() {
                Ok(event) => event,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "subscriber lagged, events dropped");
                    continue;
                }
            };
            if self.filter.matches(&event) {
                return Some(event);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Ok(mut subs) = self.subscriptions.write() {
            if let Some(count) = subs.get_mut(&self.topic_key) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    subs.remove(&self.topic_key);
                }
            }
        }
    }
}
