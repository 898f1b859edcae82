//! # Reference Gates and Handles
//!
//! Every node in the host's graph owns a [`RefGate`]: a counter of live
//! acquired references plus the wait/notify primitive the unload walk
//! parks on while it waits for the count to drain. The gate is deliberately
//! independent of the host's structural lock, so releasing a reference from
//! unrelated code never contends with graph mutation.
//!
//! An acquired reference is a [`Handle`]. Dropping the handle releases the
//! reference and wakes any unload waiting on the gate.

use crate::component::Component;
use parking_lot::{Condvar, Mutex};
use std::ops::Deref;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Live-reference counter with a drain condition.
#[derive(Debug, Default)]
pub struct RefGate {
    count: Mutex<u64>,
    drained: Condvar,
}

impl RefGate {
    /// Create a gate with zero live references.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current live-reference count.
    #[must_use]
    pub fn count(&self) -> u64 {
        *self.count.lock()
    }

    /// Record one more live reference.
    pub fn acquire(&self) {
        *self.count.lock() += 1;
    }

    /// Record one reference released. Returns `false` (and warns) when the
    /// count is already zero; a caller bug, kept non-fatal.
    pub fn release(&self) -> bool {
        let mut count = self.count.lock();
        if *count == 0 {
            warn!("reference released on a gate whose count is already zero");
            return false;
        }
        *count -= 1;
        if *count == 0 {
            self.drained.notify_all();
        }
        true
    }

    /// Block until the count reaches zero, waiting at most `timeout`.
    /// Returns `true` if the gate drained, `false` on timeout.
    pub fn wait_drained(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut count = self.count.lock();
        while *count > 0 {
            if self.drained.wait_until(&mut count, deadline).timed_out() {
                return *count == 0;
            }
        }
        true
    }
}

/// An acquired reference to a live component.
///
/// Holding a handle pins the component: the unload orchestrator will not
/// destroy it until every handle is dropped (or its bounded wait expires).
/// The handle derefs to [`Component`], so dependency calls read naturally:
/// `self.bus.name()`.
pub struct Handle {
    name: &'static str,
    instance: Arc<dyn Component>,
    gate: Arc<RefGate>,
}

impl Handle {
    /// Wrap an instance, recording the reference on its gate.
    #[must_use]
    pub fn new(instance: Arc<dyn Component>, gate: Arc<RefGate>) -> Self {
        gate.acquire();
        Self {
            name: instance.name(),
            instance,
            gate,
        }
    }

    /// Name of the referenced component.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The shared instance itself.
    #[must_use]
    pub fn instance(&self) -> &Arc<dyn Component> {
        &self.instance
    }

    /// Downcast to the concrete component type.
    #[must_use]
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.instance.as_any().downcast_ref::<T>()
    }
}

impl Deref for Handle {
    type Target = dyn Component;

    fn deref(&self) -> &Self::Target {
        &*self.instance
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.gate.release();
    }
}

impl std::fmt::Debug for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle").field("name", &self.name).finish()
    }
}
