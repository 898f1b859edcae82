//! # Plugboard Bus - Event Bus for Host and Component Communication
//!
//! In-process broadcast bus over which the component host publishes its
//! lifecycle events and components exchange their own notifications.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Lifecycle   │                    │  Subscriber  │
//! │  Manager     │    publish()       │  (component, │
//! │              │ ──────┐            │   test, CLI) │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │ (component)  │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! The bus is itself a hosted component (name
//! [`EVENT_BUS`](plugboard_types::EVENT_BUS)), constructed as the first of
//! the two bootstrap components. Publishing never blocks; subscribers that
//! fall behind are lagged, not waited on.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{
    BatchEntry, EventFilter, EventTopic, HostEvent, LogRecord, UnloadEntry,
};
pub use publisher::{event_bus_factory, EventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
