//! # Plugboard Host - Component Lifecycle Manager
//!
//! The heart of the workspace: hosts named singleton components supplied by
//! the embedding process or by dynamically loaded modules, constructs them
//! in true dependency order, and unloads them again under a live
//! reference-count constraint.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ComponentHost                          │
//! │                                                             │
//! │  ┌────────────┐   ┌──────────────┐   ┌──────────────────┐  │
//! │  │ Graph      │   │ Load         │   │ Unload           │  │
//! │  │ Store      │◄──┤ Orchestrator │   │ Orchestrator     │  │
//! │  │ name→node  │   │ (recursive,  │   │ (two-phase walk, │  │
//! │  │ module→set │   │  lazy order) │   │  ref-gated)      │  │
//! │  └────────────┘   └──────┬───────┘   └────────┬─────────┘  │
//! │                          │                    │            │
//! │                          ▼                    ▼            │
//! │                  ┌──────────────────────────────────┐      │
//! │                  │ Event Bus (hosted component)     │      │
//! │                  │ LoadBegin/Complete, Unload…      │      │
//! │                  └──────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Construction order is discovered, not declared
//!
//! Nothing sorts the graph up front. A batch is drained in FIFO order, and
//! each constructor pulls its dependencies through the load context, which
//! recursively constructs whatever is not built yet. A dependency reached
//! transitively is always fully constructed before its dependent resumes;
//! an explicit construction stack turns re-entry into a
//! `CircularDependency` failure instead of a hang.
//!
//! ## Locking discipline
//!
//! One structural mutex guards the graph; it is held across a whole load or
//! unload and never needs to be reentrant, because constructors receive the
//! live load context instead of calling back through the host. Reference
//! counts live in per-node gates with their own lock and
//! condvar, so releasing a handle never touches the structural mutex, and
//! the unload walk's bounded wait parks on the gate while releases proceed.

mod graph;
mod load;
mod unload;

pub mod config;
pub mod modules;

pub use config::HostConfig;
pub use modules::MANIFEST_SYMBOL;

// Contract types, re-exported so components and modules depend on a single
// crate (and so `export_components!` can name `$crate::ComponentFactory`).
pub use plugboard_types::{
    Component, ComponentFactory, DependencyResolver, Handle, LoadResult, ModuleError,
    UnloadResult, EVENT_BUS, LOG_RELAY,
};

use crate::graph::Graph;
use anyhow::bail;
use parking_lot::Mutex;
use plugboard_bus::{event_bus_factory, EventBus, HostEvent};
use plugboard_log::log_relay_factory;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// The component lifecycle manager.
///
/// Created through [`ComponentHost::bootstrap`], which constructs the two
/// core components (event bus and log relay) by the same generic machinery
/// every later batch uses, just with event emission suppressed, since the
/// bus is what is being built.
pub struct ComponentHost {
    pub(crate) graph: Mutex<Graph>,
    /// A load or unload is in progress; nested calls fail fast.
    busy: AtomicBool,
    /// Bootstrap finished; lifecycle events flow from here on.
    core_ready: AtomicBool,
    pub(crate) config: HostConfig,
}

impl ComponentHost {
    /// Create an empty host without core components. Everything works
    /// except event emission; used by bootstrap and unit tests.
    pub(crate) fn bare(config: HostConfig) -> Self {
        Self {
            graph: Mutex::new(Graph::new()),
            busy: AtomicBool::new(false),
            core_ready: AtomicBool::new(false),
            config,
        }
    }

    /// Create a host and load the two core components.
    ///
    /// The relay acquires the bus as a real dependency, so bootstrap also
    /// exercises the nested-construction path. No lifecycle events are
    /// emitted for this first batch.
    pub fn bootstrap(config: HostConfig) -> anyhow::Result<Self> {
        let host = Self::bare(config);

        let core = vec![
            event_bus_factory(host.config.bus_capacity),
            log_relay_factory(host.config.log_severity.clone()),
        ];
        if !host.load_components(core) {
            bail!("core components failed to load");
        }

        host.core_ready.store(true, Ordering::Release);
        debug!("component host bootstrapped");
        Ok(host)
    }

    /// The configuration this host was created with.
    #[must_use]
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Look up a component instance without touching its reference count.
    ///
    /// Only safe for call sites that already hold a guaranteed-live
    /// dependency edge (or otherwise know the component cannot be unloaded
    /// underneath them); anything else wants [`ComponentHost::acquire`].
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.graph.lock().node(name)?.instance.clone()
    }

    /// Acquire a live reference to a component.
    ///
    /// Increments the component's reference count; the count drops when the
    /// returned [`Handle`] is dropped. Returns `None` for names that are
    /// not currently registered and successfully constructed; there is no
    /// implicit ad-hoc loading from outside a batch.
    #[must_use]
    pub fn acquire(&self, name: &str) -> Option<Handle> {
        let graph = self.graph.lock();
        debug!(component = name, "acquire");
        let node = graph.node(name)?;
        let instance = node.instance.clone()?;
        Some(Handle::new(instance, node.gate.clone()))
    }

    /// Claim the manager-wide operation slot, or report why not.
    pub(crate) fn begin_operation(&self, operation: &str) -> Option<OperationGuard<'_>> {
        if self.busy.swap(true, Ordering::AcqRel) {
            warn!(
                operation = operation,
                "a load or unload operation is already in progress"
            );
            return None;
        }
        Some(OperationGuard(&self.busy))
    }

    /// Publish a lifecycle event through the hosted bus, if it exists yet.
    pub(crate) fn raise(&self, graph: &Graph, event: HostEvent) {
        if !self.core_ready.load(Ordering::Acquire) {
            return;
        }
        let Some(node) = graph.node(EVENT_BUS) else {
            return;
        };
        let Some(instance) = &node.instance else {
            return;
        };
        if let Some(bus) = instance.as_any().downcast_ref::<EventBus>() {
            bus.publish(event);
        }
    }
}

/// Clears the busy flag when a load or unload finishes, however it exits.
pub(crate) struct OperationGuard<'a>(&'a AtomicBool);

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
