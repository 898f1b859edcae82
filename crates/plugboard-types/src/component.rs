//! # Component Contract
//!
//! Defines the trait every hosted component implements. A component is a
//! singleton service object: the host constructs at most one instance per
//! name, hands out shared references to it, and destroys it again when it
//! is unloaded. Destruction is ordinary `Drop`; a component that holds
//! [`Handle`](crate::Handle)s to its dependencies releases them there.

use std::any::Any;

/// Name of the core event-bus component loaded during bootstrap.
pub const EVENT_BUS: &str = "plugboard/event-bus";

/// Name of the core log-relay component loaded during bootstrap.
pub const LOG_RELAY: &str = "plugboard/log-relay";

/// A singleton service object managed by the component host.
///
/// Implementations must be `Send + Sync`: instances are shared across
/// threads behind `Arc` and the host gives out references concurrently.
pub trait Component: Send + Sync + 'static {
    /// The unique name this component is registered under. Must match the
    /// name on the [`ComponentFactory`](crate::ComponentFactory) that built
    /// it.
    fn name(&self) -> &'static str;

    /// Whether this component may be unloaded at runtime. Defaults to
    /// `true`; override for components whose side effects cannot be undone
    /// once installed.
    fn is_unloadable(&self) -> bool {
        true
    }

    /// Downcasting support for callers that need the concrete type.
    fn as_any(&self) -> &dyn Any;
}
