//! # Unload Orchestrator
//!
//! Dependent-safe, reference-gated teardown. A node can only be freed once
//! every node that depends on it is gone, so the walk is an iterative
//! two-phase depth traversal over the *dependents* direction: the first
//! visit queues everything above a node, and the second visit, reached only
//! after those have settled, performs the actual teardown. Each node is
//! queued at most once, and every requested name ends with exactly one
//! terminal result.

use crate::ComponentHost;
use plugboard_bus::{HostEvent, UnloadEntry};
use plugboard_types::UnloadResult;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error};

/// Terminal decisions in the order they were reached.
#[derive(Default)]
struct UnloadReport {
    order: Vec<String>,
    map: HashMap<String, UnloadResult>,
}

impl UnloadReport {
    fn record(&mut self, name: &str, result: UnloadResult) {
        if !self.map.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.map.insert(name.to_string(), result);
    }

    fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    fn into_entries(self) -> Vec<UnloadEntry> {
        self.order
            .into_iter()
            .map(|name| {
                let result = self.map[&name];
                UnloadEntry { name, result }
            })
            .collect()
    }
}

impl ComponentHost {
    /// Unload a set of components by name.
    ///
    /// With `unload_deps` false, a node outside the requested set acts as a
    /// boundary: the walk does not descend through it, and whatever it
    /// shields stays loaded. With `unload_deps` true the walk cascades,
    /// unloading dependents before the components they depend on.
    ///
    /// Returns one terminal result per reached name (requested names that
    /// are not registered report `NameNotFound` immediately; requested
    /// names the walk never settles report `NotReached`). The same results
    /// travel in the `UnloadComplete` event. Fails immediately, unloading
    /// nothing, if a load or unload is already in progress.
    pub fn unload_components(&self, names: &[&str], unload_deps: bool) -> Vec<UnloadEntry> {
        let Some(_op) = self.begin_operation("unload") else {
            return Vec::new();
        };

        let mut graph = self.graph.lock();

        self.raise(
            &graph,
            HostEvent::UnloadBegin {
                names: names.iter().map(ToString::to_string).collect(),
                count: names.len(),
                unload_deps,
            },
        );

        let mut report = UnloadReport::default();
        let mut requested: HashSet<String> = HashSet::new();
        for name in names {
            if graph.contains(name) {
                requested.insert((*name).to_string());
            } else {
                error!(component = name, "cannot unload component that is not loaded");
                report.record(name, UnloadResult::NameNotFound);
            }
        }

        graph.reset_walk_markers();

        // Seed the walk with the requested nodes, in request order.
        let mut stack: Vec<String> = Vec::new();
        for name in names {
            if let Some(node) = graph.node_mut(name) {
                if !node.queued {
                    node.queued = true;
                    stack.push((*name).to_string());
                }
            }
        }

        while let Some(name) = stack.last().cloned() {
            let Some(node) = graph.node(&name) else {
                stack.pop();
                continue;
            };

            if node.visited && node.finalized {
                stack.pop();
                continue;
            }

            // A node outside the requested set is a boundary when cascading
            // is off: leave it alone and record nothing for it.
            if !unload_deps && !requested.contains(&name) {
                error!(
                    component = %name,
                    "cannot unload dependent component, cascading is disabled"
                );
                if let Some(node) = graph.node_mut(&name) {
                    node.visited = true;
                    node.finalized = true;
                }
                stack.pop();
                continue;
            }

            let unloadable = node
                .instance
                .as_ref()
                .is_some_and(|instance| instance.is_unloadable());
            if !unloadable {
                error!(component = %name, "component is marked as not unloadable");
                report.record(&name, UnloadResult::IsNotUnloadable);
                if let Some(node) = graph.node_mut(&name) {
                    node.visited = true;
                    node.finalized = true;
                }
                stack.pop();
                continue;
            }

            if node.visited {
                // Second visit: everything above this node has settled.
                if !node.dependents.is_empty() {
                    error!(
                        component = %name,
                        "component is still required by a component that did not unload"
                    );
                    report.record(&name, UnloadResult::HasDependentComponent);
                    if let Some(node) = graph.node_mut(&name) {
                        node.finalized = true;
                    }
                    stack.pop();
                    continue;
                }

                let gate = node.gate.clone();
                if !gate.wait_drained(self.config.unload_wait) {
                    error!(
                        component = %name,
                        "timed out waiting for live references to drain"
                    );
                    report.record(&name, UnloadResult::ReferenceStillHeld);
                    if let Some(node) = graph.node_mut(&name) {
                        node.finalized = true;
                    }
                    stack.pop();
                    continue;
                }

                // Safe to free: unlink, erase, and run the destructor. The
                // instance drop releases this node's own dependency handles,
                // draining the gates of the nodes below it on the stack.
                let removed = graph.unlink_and_remove(&name);
                drop(removed);
                debug!(component = %name, "component unloaded");
                report.record(&name, UnloadResult::Success);
                stack.pop();
                continue;
            }

            // First visit: queue every current dependent above this node.
            let dependents: Vec<String> = node.dependents.iter().cloned().collect();
            if let Some(node) = graph.node_mut(&name) {
                node.visited = true;
                node.finalized = false;
            }
            for dependent in dependents {
                if let Some(dependent_node) = graph.node_mut(&dependent) {
                    if !dependent_node.queued {
                        dependent_node.queued = true;
                        stack.push(dependent);
                    }
                }
            }
        }

        // A requested name the walk never settled is reported explicitly
        // rather than silently omitted.
        for name in names {
            if requested.contains(*name) && !report.contains(name) {
                report.record(name, UnloadResult::NotReached);
            }
        }

        let entries = report.into_entries();
        self.raise(
            &graph,
            HostEvent::UnloadComplete {
                results: entries.clone(),
                count: entries.len(),
            },
        );

        entries
    }
}
