//! # Lifecycle Results
//!
//! Per-entry outcomes reported by the load and unload orchestrators, both
//! in their return values and in the lifecycle events published on the bus.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of loading one component of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadResult {
    /// No load attempt has been made yet. Internal initial state; every
    /// completed batch entry settles on one of the other variants.
    None,
    /// Component was constructed and registered.
    Success,
    /// A component with the same name is already registered (or appears
    /// earlier in the same batch).
    NameConflict,
    /// The component acquired a dependency that exists neither in the
    /// registry nor in the current batch.
    DependencyNotFound,
    /// The component participates in a dependency cycle.
    CircularDependency,
    /// The component acquired a dependency whose own construction failed.
    DependencyFailedToLoad,
}

impl LoadResult {
    /// Whether this entry loaded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for LoadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::None => "not attempted",
            Self::Success => "success",
            Self::NameConflict => "name conflict",
            Self::DependencyNotFound => "dependency not found",
            Self::CircularDependency => "circular dependency",
            Self::DependencyFailedToLoad => "dependency failed to load",
        };
        f.write_str(text)
    }
}

/// Outcome of unloading one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnloadResult {
    /// Component was destroyed and removed from the registry.
    Success,
    /// The requested name is not currently registered.
    NameNotFound,
    /// A dependent component could not be unloaded, so this one stays.
    HasDependentComponent,
    /// Live references remained after the bounded wait expired.
    ReferenceStillHeld,
    /// The component declares itself non-unloadable.
    IsNotUnloadable,
    /// The walk finished without reaching a terminal decision for this
    /// requested name.
    NotReached,
}

impl UnloadResult {
    /// Whether this entry was unloaded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for UnloadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Success => "success",
            Self::NameNotFound => "name not found",
            Self::HasDependentComponent => "has dependent component",
            Self::ReferenceStillHeld => "reference still held",
            Self::IsNotUnloadable => "not unloadable",
            Self::NotReached => "not reached",
        };
        f.write_str(text)
    }
}
