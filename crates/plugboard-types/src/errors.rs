//! # Error Types
//!
//! Typed failures for module (shared library) association. Component-level
//! outcomes are not errors (they are [`LoadResult`](crate::LoadResult) /
//! [`UnloadResult`](crate::UnloadResult) statuses), so this enum only
//! covers the OS-loader boundary.

use thiserror::Error;

/// Errors raised while resolving a shared library's component manifest.
#[derive(Debug, Error)]
pub enum ModuleError {
    /// The library file could not be opened by the OS loader.
    #[error("module \"{path}\" could not be opened: {reason}")]
    OpenFailed {
        /// Path handed to the loader.
        path: String,
        /// Loader-reported reason.
        reason: String,
    },

    /// The library does not export the component manifest symbol.
    #[error("module \"{path}\" does not export \"{symbol}\"")]
    ManifestMissing {
        /// Path of the offending library.
        path: String,
        /// The fixed export every component module must provide.
        symbol: &'static str,
    },

    /// The module name is not associated with any open library.
    #[error("module \"{0}\" is not loaded")]
    NotLoaded(String),
}
