//! # Component Factories
//!
//! A [`ComponentFactory`] is the immutable descriptor a module hands to the
//! host for each component it provides: a unique name plus a build closure.
//! The build closure receives the live [`DependencyResolver`] of the load
//! operation that is constructing it; every dependency it acquires through
//! that resolver becomes an edge in the host's graph and pins the
//! dependency's reference count until the built instance is dropped.

use crate::component::Component;
use crate::refcount::Handle;
use std::fmt;
use std::sync::Arc;

/// Resolution surface handed to a component constructor while a load
/// operation is in progress.
///
/// Constructors must go through this trait rather than calling back into
/// the host: the host's structural lock is already held by the load that
/// invoked the constructor, and the resolver is the explicit continuation
/// of that operation.
pub trait DependencyResolver {
    /// Acquire a dependency by name, constructing it first if it is part of
    /// the current batch and not yet built.
    ///
    /// Returns `None` if the name is unknown, already failed, or would
    /// close a dependency cycle; in each case the failure is recorded
    /// against the component currently under construction, so a
    /// constructor can simply propagate with `?`.
    fn acquire(&mut self, name: &str) -> Option<Handle>;

    /// Look up an already-constructed component without touching its
    /// reference count. Only safe for call sites that know the component
    /// outlives them.
    fn get(&self, name: &str) -> Option<Arc<dyn Component>>;
}

type BuildFn =
    Arc<dyn Fn(&mut dyn DependencyResolver) -> Option<Arc<dyn Component>> + Send + Sync>;

/// Immutable (name, constructor) descriptor for one component.
///
/// The destructor half of the pair is the instance's `Drop` impl; the host
/// runs it by dropping its `Arc` when the component is unloaded or its
/// construction fails.
#[derive(Clone)]
pub struct ComponentFactory {
    name: &'static str,
    build: BuildFn,
}

impl ComponentFactory {
    /// Create a factory from a name and build closure.
    ///
    /// Returning `None` from the closure marks the construction as failed;
    /// any partially built instance is dropped by the host.
    pub fn new<F>(name: &'static str, build: F) -> Self
    where
        F: Fn(&mut dyn DependencyResolver) -> Option<Arc<dyn Component>> + Send + Sync + 'static,
    {
        Self {
            name,
            build: Arc::new(build),
        }
    }

    /// The unique name this factory registers under.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the constructor.
    pub fn build(&self, resolver: &mut dyn DependencyResolver) -> Option<Arc<dyn Component>> {
        (self.build)(resolver)
    }
}

impl fmt::Debug for ComponentFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentFactory")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
