//! # Log Relay
//!
//! The relay component itself. `log` takes a source, a severity label and
//! a message, consults the filter under a read lock, then forwards the
//! record with no lock held: a subscriber reacting to the record may log
//! again, and must not deadlock against the filter lock.

use crate::filter::{FilterUpdate, LogFilter};
use crate::severity;
use parking_lot::RwLock;
use plugboard_bus::{EventBus, HostEvent, LogRecord};
use plugboard_types::{Component, ComponentFactory, Handle, EVENT_BUS, LOG_RELAY};
use std::any::Any;
use std::sync::Arc;

/// The hosted log relay component.
pub struct LogRelay {
    bus: Handle,
    filter: RwLock<LogFilter>,
}

impl LogRelay {
    /// Create a relay forwarding to the given bus handle, with an optional
    /// initial severity filter (a regex over the severity label).
    pub fn new(bus: Handle, severity_filter: Option<&str>) -> Result<Self, regex::Error> {
        let mut filter = LogFilter::new();
        if let Some(pattern) = severity_filter {
            filter.update(
                FilterUpdate::Keep,
                FilterUpdate::Set(pattern.to_string()),
                FilterUpdate::Keep,
            )?;
        }
        Ok(Self {
            bus,
            filter: RwLock::new(filter),
        })
    }

    /// Relay one record if it passes the current filters.
    pub fn log(&self, source: &str, sev: &str, message: &str) {
        let record = LogRecord {
            source: source.to_string(),
            severity: sev.to_string(),
            message: message.to_string(),
        };

        {
            let filter = self.filter.read();
            if !filter.passes(&record) {
                return;
            }
        }

        // Filter lock released: a subscriber may call back into the relay.
        match record.severity.as_str() {
            severity::ERROR => tracing::error!(source = %record.source, "{}", record.message),
            severity::WARN => tracing::warn!(source = %record.source, "{}", record.message),
            severity::INFO => tracing::info!(source = %record.source, "{}", record.message),
            _ => tracing::debug!(source = %record.source, "{}", record.message),
        }

        if let Some(bus) = self.bus.downcast_ref::<EventBus>() {
            bus.publish(HostEvent::Log(record));
        }
    }

    /// Relay a debug-severity record.
    pub fn debug(&self, source: &str, message: &str) {
        self.log(source, severity::DEBUG, message);
    }

    /// Relay an info-severity record.
    pub fn info(&self, source: &str, message: &str) {
        self.log(source, severity::INFO, message);
    }

    /// Relay a warn-severity record.
    pub fn warn(&self, source: &str, message: &str) {
        self.log(source, severity::WARN, message);
    }

    /// Relay an error-severity record.
    pub fn error(&self, source: &str, message: &str) {
        self.log(source, severity::ERROR, message);
    }

    /// Replace the filters. Each field is updated independently.
    pub fn set_filter(
        &self,
        source: FilterUpdate,
        sev: FilterUpdate,
        message: FilterUpdate,
    ) -> Result<(), regex::Error> {
        self.filter.write().update(source, sev, message)
    }
}

impl Component for LogRelay {
    fn name(&self) -> &'static str {
        LOG_RELAY
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Factory for the relay. Acquires the event bus as a dependency, so the
/// relay can only be constructed after (or transitively through) the bus,
/// and is always destroyed before it.
#[must_use]
pub fn log_relay_factory(severity_filter: Option<String>) -> ComponentFactory {
    ComponentFactory::new(LOG_RELAY, move |ctx| {
        let bus = ctx.acquire(EVENT_BUS)?;
        match LogRelay::new(bus, severity_filter.as_deref()) {
            Ok(relay) => Some(Arc::new(relay)),
            Err(err) => {
                tracing::error!(error = %err, "invalid log severity filter");
                None
            }
        }
    })
}
