//! # Module Association
//!
//! Shared-library batch operations. A component module is any dynamic
//! library exporting the fixed manifest symbol declared by
//! [`export_components!`]; loading resolves that symbol, tags every factory
//! in the manifest with the library's name, and feeds the combined batch to
//! the load orchestrator. A library is only closed once its node set in the
//! registry has drained.
//!
//! The manifest is an `extern "Rust"` function, so host and modules must be
//! built with the same toolchain. Closing a library while `get`-obtained
//! `Arc`s of its components are still alive is undefined behavior, exactly
//! as it is for every dynamic-loading scheme; the reference gates exist so
//! disciplined callers never get there.

use crate::ComponentHost;
use libloading::Library;
use plugboard_bus::UnloadEntry;
use plugboard_types::{ComponentFactory, ModuleError};
use tracing::{debug, error};

/// The fixed export every component module must provide.
pub const MANIFEST_SYMBOL: &str = "plugboard_components";

type ManifestFn = unsafe extern "Rust" fn() -> Vec<ComponentFactory>;

/// Declare a module's component manifest.
///
/// ```ignore
/// plugboard_host::export_components![
///     my_scanner_factory(),
///     my_overlay_factory(),
/// ];
/// ```
#[macro_export]
macro_rules! export_components {
    ($($factory:expr),+ $(,)?) => {
        #[no_mangle]
        pub extern "Rust" fn plugboard_components() -> Vec<$crate::ComponentFactory> {
            vec![$($factory),+]
        }
    };
}

/// Call a library's manifest export.
fn read_manifest(library: &Library, path: &str) -> Result<Vec<ComponentFactory>, ModuleError> {
    // SAFETY: the symbol is our own fixed contract; a library that exports
    // it under this name with a different signature is out of contract.
    let manifest = unsafe {
        library
            .get::<ManifestFn>(MANIFEST_SYMBOL.as_bytes())
            .map_err(|_| ModuleError::ManifestMissing {
                path: path.to_string(),
                symbol: MANIFEST_SYMBOL,
            })?
    };
    Ok(unsafe { manifest() })
}

impl ComponentHost {
    /// Load every component exported by the given shared libraries, as one
    /// combined batch.
    ///
    /// A library that cannot be opened or carries no manifest is logged and
    /// skipped; its absence fails the call but not the other libraries'
    /// components. Returns `true` iff every library resolved and every
    /// component loaded.
    pub fn load_modules(&self, paths: &[&str]) -> bool {
        let mut batch: Vec<(ComponentFactory, Option<String>)> = Vec::new();
        let mut resolved_all = true;

        for path in paths {
            let manifest = {
                let graph = self.graph.lock();
                if let Some(library) = graph.library(path) {
                    // Already open: reuse the existing handle.
                    read_manifest(library, path)
                } else {
                    drop(graph);
                    match unsafe { Library::new(path) } {
                        Ok(library) => read_manifest(&library, path).map(|factories| {
                            self.graph.lock().register_library((*path).to_string(), library);
                            factories
                        }),
                        Err(err) => Err(ModuleError::OpenFailed {
                            path: (*path).to_string(),
                            reason: err.to_string(),
                        }),
                    }
                }
            };

            match manifest {
                Ok(factories) => {
                    debug!(module = path, components = factories.len(), "module manifest resolved");
                    for factory in factories {
                        batch.push((factory, Some((*path).to_string())));
                    }
                }
                Err(err) => {
                    error!(module = path, error = %err, "skipping module");
                    resolved_all = false;
                }
            }
        }

        let all_loaded = self.load_batch(batch);
        resolved_all && all_loaded
    }

    /// Unload every component supplied by the given modules, closing each
    /// library once its node set is empty.
    pub fn unload_modules(&self, modules: &[&str], unload_deps: bool) -> Vec<UnloadEntry> {
        let mut components: Vec<String> = Vec::new();
        {
            let graph = self.graph.lock();
            for module in modules {
                if !graph.has_library(module) {
                    error!(module = module, "module is not loaded");
                    continue;
                }
                components.extend(graph.module_members(module));
            }
        }

        let names: Vec<&str> = components.iter().map(String::as_str).collect();
        let report = self.unload_components(&names, unload_deps);

        let mut graph = self.graph.lock();
        for module in modules {
            if graph.has_library(module) && graph.module_members(module).is_empty() {
                if let Some(library) = graph.take_library(module) {
                    drop(library);
                    debug!(module = module, "module library closed");
                }
            }
        }

        report
    }
}
