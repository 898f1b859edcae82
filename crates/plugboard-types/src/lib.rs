//! # Plugboard Types Crate
//!
//! This crate contains the component contract shared by every crate in the
//! workspace: the [`Component`] trait implemented by singleton services, the
//! [`ComponentFactory`] descriptor a module hands to the host, the RAII
//! [`Handle`] returned by acquisition, and the result enums the lifecycle
//! manager reports.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every cross-crate type lives here, so that
//!   component crates depend on this crate only, never on the host.
//! - **Identity by name**: components are addressed by a unique string name;
//!   the host never inspects their concrete type.
//! - **Release is Drop**: an acquired reference is a [`Handle`]; dropping it
//!   is the release. A forgotten release is a leaked handle, not a silent
//!   count mismatch.

pub mod component;
pub mod errors;
pub mod factory;
pub mod refcount;
pub mod results;

pub use component::{Component, EVENT_BUS, LOG_RELAY};
pub use errors::ModuleError;
pub use factory::{ComponentFactory, DependencyResolver};
pub use refcount::{Handle, RefGate};
pub use results::{LoadResult, UnloadResult};
