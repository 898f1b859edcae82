//! Reusable test components.
//!
//! `TestService` is a minimal hosted component: it acquires a fixed list of
//! dependencies at construction, optionally refuses unloading, and can
//! append its name to a shared drop log so tests can assert destruction
//! order.

use plugboard_host::{ComponentHost, HostConfig};
use plugboard_types::{Component, ComponentFactory, Handle};
use std::any::Any;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared record of destruction order.
pub type DropLog = Arc<Mutex<Vec<&'static str>>>;

/// Create an empty drop log.
pub fn new_drop_log() -> DropLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Snapshot a drop log's contents.
pub fn drops(log: &DropLog) -> Vec<&'static str> {
    log.lock().unwrap().clone()
}

/// A minimal hosted component for tests.
pub struct TestService {
    name: &'static str,
    unloadable: bool,
    drop_log: Option<DropLog>,
    _deps: Vec<Handle>,
}

impl Component for TestService {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_unloadable(&self) -> bool {
        self.unloadable
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        if let Some(log) = &self.drop_log {
            log.lock().unwrap().push(self.name);
        }
    }
}

fn build_factory(
    name: &'static str,
    deps: &[&'static str],
    unloadable: bool,
    drop_log: Option<DropLog>,
) -> ComponentFactory {
    let deps = deps.to_vec();
    ComponentFactory::new(name, move |ctx| {
        let handles: Option<Vec<Handle>> = deps.iter().map(|dep| ctx.acquire(dep)).collect();
        Some(Arc::new(TestService {
            name,
            unloadable,
            drop_log: drop_log.clone(),
            _deps: handles?,
        }))
    })
}

/// An ordinary service acquiring the given dependencies.
pub fn service(name: &'static str, deps: &[&'static str]) -> ComponentFactory {
    build_factory(name, deps, true, None)
}

/// A service that refuses to be unloaded.
pub fn pinned_service(name: &'static str, deps: &[&'static str]) -> ComponentFactory {
    build_factory(name, deps, false, None)
}

/// A service recording its destruction in `log`.
pub fn logged_service(name: &'static str, deps: &[&'static str], log: &DropLog) -> ComponentFactory {
    build_factory(name, deps, true, Some(log.clone()))
}

/// A bootstrapped host with a short unload wait, so negative tests finish
/// quickly.
pub fn quick_host() -> ComponentHost {
    plugboard_log::init_tracing("warn");
    ComponentHost::bootstrap(HostConfig::default().with_unload_wait(Duration::from_millis(20)))
        .expect("bootstrap")
}
