//! # Plugboard Log - Log Relay Component
//!
//! Components log through the relay rather than straight to a sink: the
//! relay applies runtime-configurable regex filters over source, severity
//! and message, then forwards every surviving record both to the event bus
//! (as [`HostEvent::Log`](plugboard_bus::HostEvent)) and to the process
//! `tracing` subscriber. Front-ends such as a console or file writer
//! subscribe to the bus; they never talk to the relay directly.
//!
//! The relay is the second of the two bootstrap components and acquires
//! the event bus as a real dependency, so it is destroyed before the bus
//! on teardown.

pub mod filter;
pub mod relay;

pub use filter::{FilterUpdate, LogFilter};
pub use relay::{log_relay_factory, LogRelay};

/// Severity labels used by the relay and its filters.
pub mod severity {
    /// Diagnostic detail, off by default in most front-ends.
    pub const DEBUG: &str = "debug";
    /// Normal operational messages.
    pub const INFO: &str = "info";
    /// Something suspicious but recoverable.
    pub const WARN: &str = "warn";
    /// An operation failed.
    pub const ERROR: &str = "error";
}

/// Install a process-wide `tracing` subscriber honoring `RUST_LOG`, with
/// `filter` as the fallback directive. Safe to call more than once; later
/// calls are no-ops.
pub fn init_tracing(filter: &str) {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.to_string()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}
