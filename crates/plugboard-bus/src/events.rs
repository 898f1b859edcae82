//! # Host Events
//!
//! Defines every event type that flows over the bus: the four fixed
//! lifecycle notifications raised by the component host, and the log
//! records forwarded by the log relay.

use plugboard_types::{LoadResult, UnloadResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One batch entry of a completed load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Component name as registered by its factory.
    pub name: String,
    /// Outcome for this entry.
    pub result: LoadResult,
}

/// One entry of a completed unload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnloadEntry {
    /// Component name.
    pub name: String,
    /// Outcome for this entry.
    pub result: UnloadResult,
}

/// A log record forwarded by the log relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Originating component or subsystem.
    pub source: String,
    /// Severity label, one of the `severity::*` constants.
    pub severity: String,
    /// Formatted message text.
    pub message: String,
}

/// All events that can be published to the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostEvent {
    /// A batch component load has begun.
    LoadBegin {
        /// Correlates this begin with its completion.
        batch_id: Uuid,
        /// Names of the factories submitted, in batch order.
        names: Vec<String>,
        /// Batch size.
        count: usize,
    },

    /// A batch component load has completed.
    LoadComplete {
        /// Correlates with the matching [`HostEvent::LoadBegin`].
        batch_id: Uuid,
        /// Per-entry outcomes, in batch order.
        results: Vec<BatchEntry>,
        /// Batch size.
        count: usize,
    },

    /// An unload operation has begun.
    UnloadBegin {
        /// Names requested for unload.
        names: Vec<String>,
        /// Request size.
        count: usize,
        /// Whether dependents are unloaded instead of refusing.
        unload_deps: bool,
    },

    /// An unload operation has completed. Results may cover more names
    /// than were requested when the walk cascaded through dependents.
    UnloadComplete {
        /// Terminal decision per reached name.
        results: Vec<UnloadEntry>,
        /// Number of result entries.
        count: usize,
    },

    /// A log record passed the relay's filters.
    Log(LogRecord),
}

impl HostEvent {
    /// The topic this event is published under.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::LoadBegin { .. }
            | Self::LoadComplete { .. }
            | Self::UnloadBegin { .. }
            | Self::UnloadComplete { .. } => EventTopic::Lifecycle,
            Self::Log(_) => EventTopic::Log,
        }
    }
}

/// Coarse event categories used for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventTopic {
    /// Load/unload notifications from the component host.
    Lifecycle,
    /// Forwarded log records.
    Log,
}

/// Filter applied on the subscriber side of the bus.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    topics: Option<Vec<EventTopic>>,
}

impl EventFilter {
    /// Match every event.
    #[must_use]
    pub fn all() -> Self {
        Self { topics: None }
    }

    /// Match only the given topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics: Some(topics),
        }
    }

    /// Whether `event` passes this filter.
    #[must_use]
    pub fn matches(&self, event: &HostEvent) -> bool {
        match &self.topics {
            None => true,
            Some(topics) => topics.contains(&event.topic()),
        }
    }

    /// Stable key describing the filtered topics, used for subscription
    /// accounting.
    #[must_use]
    pub fn topic_key(&self) -> String {
        match &self.topics {
            None => "all".to_string(),
            Some(topics) => format!("{topics:?}"),
        }
    }
}
