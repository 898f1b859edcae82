//! # Graph Store
//!
//! The registry's backing container: one [`Node`] per loaded or loading
//! component, indexed by name and by owning module, plus the table of open
//! shared libraries. Nodes reference each other through name sets rather
//! than owning pointers, so the dependency graph can be cyclic during a
//! failed load without creating ownership cycles, and teardown can always
//! unlink edges before a node is dropped.
//!
//! Everything here is mutated under the host's structural lock; the store
//! itself holds no locks.

use libloading::Library;
use plugboard_types::{Component, ComponentFactory, LoadResult, RefGate};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Bookkeeping record for one component.
pub(crate) struct Node {
    /// The immutable descriptor this node was created from.
    pub(crate) factory: ComponentFactory,
    /// Owning shared library, `None` for host-process batches.
    pub(crate) module: Option<String>,
    /// Present iff `status == LoadResult::Success`.
    pub(crate) instance: Option<Arc<dyn Component>>,
    /// Names this component acquired during construction.
    pub(crate) dependencies: HashSet<String>,
    /// Names that acquired this component during their construction.
    pub(crate) dependents: HashSet<String>,
    /// Load outcome; `None` until construction settles.
    pub(crate) status: LoadResult,
    /// Set once the constructor has been entered; drives cycle detection.
    pub(crate) construction_started: bool,
    /// Set when an acquire failure or the constructor itself failed.
    pub(crate) failed: bool,
    /// Live-reference gate the unload walk parks on.
    pub(crate) gate: Arc<RefGate>,
    // Transient unload-walk markers, reset at the start of every walk.
    pub(crate) visited: bool,
    pub(crate) finalized: bool,
    pub(crate) queued: bool,
}

impl Node {
    pub(crate) fn new(factory: ComponentFactory, module: Option<String>) -> Self {
        Self {
            factory,
            module,
            instance: None,
            dependencies: HashSet::new(),
            dependents: HashSet::new(),
            status: LoadResult::None,
            construction_started: false,
            failed: false,
            gate: Arc::new(RefGate::new()),
            visited: false,
            finalized: false,
            queued: false,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.factory.name()
    }
}

/// Name- and module-indexed node container.
#[derive(Default)]
pub(crate) struct Graph {
    nodes: HashMap<String, Node>,
    by_module: HashMap<String, HashSet<String>>,
    libraries: HashMap<String, Library>,
}

impl Graph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub(crate) fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub(crate) fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.get_mut(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Insert a node, indexing it under its module when it has one. The
    /// caller has already ruled out a name conflict.
    pub(crate) fn insert(&mut self, node: Node) {
        let name = node.name().to_string();
        if let Some(module) = &node.module {
            self.by_module
                .entry(module.clone())
                .or_default()
                .insert(name.clone());
        }
        self.nodes.insert(name, node);
    }

    /// Record the mutual edge "`dependent` requires `dependency`".
    pub(crate) fn add_edge(&mut self, dependent: &str, dependency: &str) {
        if let Some(node) = self.nodes.get_mut(dependent) {
            node.dependencies.insert(dependency.to_string());
        }
        if let Some(node) = self.nodes.get_mut(dependency) {
            node.dependents.insert(dependent.to_string());
        }
    }

    /// Unlink every edge touching `name` from its neighbors, remove the
    /// node from both indexes, and hand it back to the caller (dropping it
    /// runs the instance destructor).
    pub(crate) fn unlink_and_remove(&mut self, name: &str) -> Option<Node> {
        let node = self.nodes.remove(name)?;

        for dependency in &node.dependencies {
            if let Some(other) = self.nodes.get_mut(dependency) {
                other.dependents.remove(name);
            }
        }
        for dependent in &node.dependents {
            if let Some(other) = self.nodes.get_mut(dependent) {
                other.dependencies.remove(name);
            }
        }
        if let Some(module) = &node.module {
            if let Some(members) = self.by_module.get_mut(module) {
                members.remove(name);
                if members.is_empty() {
                    self.by_module.remove(module);
                }
            }
        }

        Some(node)
    }

    /// Current members of a module's node set.
    pub(crate) fn module_members(&self, module: &str) -> Vec<String> {
        self.by_module
            .get(module)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Reset the transient unload-walk markers on every node.
    pub(crate) fn reset_walk_markers(&mut self) {
        for node in self.nodes.values_mut() {
            node.visited = false;
            node.finalized = false;
            node.queued = false;
        }
    }

    pub(crate) fn register_library(&mut self, module: String, library: Library) {
        self.libraries.insert(module, library);
    }

    pub(crate) fn has_library(&self, module: &str) -> bool {
        self.libraries.contains_key(module)
    }

    pub(crate) fn library(&self, module: &str) -> Option<&Library> {
        self.libraries.get(module)
    }

    /// Detach an open library so the caller can close it.
    pub(crate) fn take_library(&mut self, module: &str) -> Option<Library> {
        self.libraries.remove(module)
    }
}
