//! # Load Orchestrator
//!
//! Batch registration plus recursive, lazily-ordered construction.
//! Construction order is not declared anywhere: it is discovered as each
//! constructor acquires its dependencies through the [`LoadContext`], which
//! recursively constructs anything in the batch that is not built yet. An
//! explicit construction stack detects cycles and attributes failures to
//! the component that caused them, without disturbing batch siblings that
//! already succeeded.

use crate::graph::{Graph, Node};
use crate::ComponentHost;
use plugboard_bus::{BatchEntry, HostEvent};
use plugboard_types::{Component, ComponentFactory, DependencyResolver, Handle, LoadResult};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// The live state of one batch load, threaded into every constructor.
///
/// Holding the exclusive graph borrow here is what makes nested
/// construction safe without a reentrant lock: a constructor that acquires
/// a dependency re-enters the load machinery through this value, on this
/// thread, with no further locking.
pub(crate) struct LoadContext<'g> {
    pub(crate) graph: &'g mut Graph,
    stack: Vec<String>,
}

impl<'g> LoadContext<'g> {
    pub(crate) fn new(graph: &'g mut Graph) -> Self {
        Self {
            graph,
            stack: Vec::new(),
        }
    }

    /// Construct the named node. Returns `true` iff it reached `Success`.
    pub(crate) fn construct(&mut self, name: &str) -> bool {
        debug!(component = name, "constructing");

        let Some(node) = self.graph.node_mut(name) else {
            return false;
        };
        let factory = node.factory.clone();
        node.construction_started = true;
        node.failed = false;

        self.stack.push(name.to_string());
        let built = factory.build(self);
        self.stack.pop();

        let Some(node) = self.graph.node_mut(name) else {
            return false;
        };

        if !node.failed && built.is_some() {
            node.instance = built;
            node.status = LoadResult::Success;
            debug!(component = name, "constructed");
            return true;
        }

        // Failed: destroy whatever partial instance exists and keep the
        // recorded failure, defaulting when the constructor gave no cause.
        drop(built);
        node.failed = true;
        if node.status == LoadResult::None {
            node.status = LoadResult::DependencyNotFound;
        }
        match node.status {
            LoadResult::CircularDependency => {
                error!(component = name, "component is part of a dependency cycle");
            }
            LoadResult::DependencyFailedToLoad => {
                error!(component = name, "component depends on a component that failed to load");
            }
            _ => {
                error!(component = name, "component depends on a non-existing component");
            }
        }
        false
    }

    /// Mark the component currently under construction as failed, keeping
    /// the first recorded cause.
    fn fail_current(&mut self, result: LoadResult) {
        if let Some(current) = self.stack.last() {
            if let Some(node) = self.graph.node_mut(current) {
                node.failed = true;
                if node.status == LoadResult::None {
                    node.status = result;
                }
            }
        }
    }
}

impl DependencyResolver for LoadContext<'_> {
    fn acquire(&mut self, name: &str) -> Option<Handle> {
        debug!(component = name, "acquire during construction");

        if !self.graph.contains(name) {
            error!(component = name, "acquired component exists in neither registry nor batch");
            self.fail_current(LoadResult::DependencyNotFound);
            return None;
        }

        let (has_instance, status, started) = {
            let node = self.graph.node(name)?;
            (node.instance.is_some(), node.status, node.construction_started)
        };

        if !has_instance {
            if status != LoadResult::None {
                error!(component = name, "acquired component already failed to load");
                self.fail_current(LoadResult::DependencyFailedToLoad);
                return None;
            }
            if started {
                // Still on the construction stack below us: a cycle. The
                // failure belongs to both ends.
                error!(component = name, "dependency cycle detected");
                if let Some(node) = self.graph.node_mut(name) {
                    node.failed = true;
                    node.status = LoadResult::CircularDependency;
                }
                self.fail_current(LoadResult::CircularDependency);
                return None;
            }
            if !self.construct(name) {
                self.fail_current(LoadResult::DependencyFailedToLoad);
                return None;
            }
        }

        let current = self.stack.last().cloned();
        let node = self.graph.node(name)?;
        let instance = node.instance.clone()?;
        let gate = node.gate.clone();
        if let Some(current) = current {
            self.graph.add_edge(&current, name);
        }
        Some(Handle::new(instance, gate))
    }

    fn get(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.graph.node(name)?.instance.clone()
    }
}

impl ComponentHost {
    /// Load a batch of components supplied by the host process itself.
    ///
    /// Returns `true` iff every entry loaded. Per-entry results travel in
    /// the `LoadComplete` event. Fails immediately, loading nothing, if a
    /// load or unload is already in progress.
    pub fn load_components(&self, batch: Vec<ComponentFactory>) -> bool {
        self.load_batch(batch.into_iter().map(|factory| (factory, None)).collect())
    }

    /// Shared implementation for host-process and module batches; each
    /// factory carries the name of its owning module, if any.
    pub(crate) fn load_batch(&self, batch: Vec<(ComponentFactory, Option<String>)>) -> bool {
        let Some(_op) = self.begin_operation("load") else {
            return false;
        };

        let mut graph = self.graph.lock();
        let batch_id = Uuid::new_v4();
        let names: Vec<String> = batch
            .iter()
            .map(|(factory, _)| factory.name().to_string())
            .collect();

        self.raise(
            &graph,
            HostEvent::LoadBegin {
                batch_id,
                names: names.clone(),
                count: names.len(),
            },
        );

        // Admit factories into the graph; conflicts are settled before any
        // construction runs so a duplicate can never shadow its original.
        let mut results = vec![LoadResult::None; batch.len()];
        let mut queue = VecDeque::new();
        for (index, (factory, module)) in batch.iter().enumerate() {
            let name = factory.name();
            if graph.contains(name) {
                error!(component = name, "a component with this name already exists");
                results[index] = LoadResult::NameConflict;
                continue;
            }
            graph.insert(Node::new(factory.clone(), module.clone()));
            queue.push_back(name.to_string());
        }

        {
            let mut ctx = LoadContext::new(&mut graph);
            while let Some(name) = queue.pop_front() {
                // A dependency acquired earlier in the drain may already
                // have settled this entry, one way or the other.
                if ctx.graph.node(&name).map(|node| node.status) == Some(LoadResult::None) {
                    ctx.construct(&name);
                }
            }
        }

        // Read back per-entry outcomes and tear down the failures. Batch
        // siblings that succeeded stay exactly as constructed.
        for (index, (factory, _)) in batch.iter().enumerate() {
            if results[index] == LoadResult::NameConflict {
                continue;
            }
            if let Some(node) = graph.node(factory.name()) {
                results[index] = node.status;
                if node.instance.is_none() {
                    graph.unlink_and_remove(factory.name());
                }
            }
        }

        let all_loaded = results.iter().all(LoadResult::is_success);
        let entries: Vec<BatchEntry> = names
            .iter()
            .zip(&results)
            .map(|(name, result)| BatchEntry {
                name: name.clone(),
                result: *result,
            })
            .collect();

        self.raise(
            &graph,
            HostEvent::LoadComplete {
                batch_id,
                results: entries,
                count: batch.len(),
            },
        );

        all_loaded
    }
}
