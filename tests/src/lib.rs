//! # Plugboard Test Suite
//!
//! Unified test crate exercising the component host end to end.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── helpers.rs        # Reusable test components and factories
//! └── integration/
//!     ├── lifecycle.rs  # Load properties: ordering, cycles, conflicts
//!     ├── unload.rs     # Unload properties: gating, cascades, ordering
//!     ├── events.rs     # Lifecycle event contracts on the bus
//!     └── stress.rs     # Concurrency behavior
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p plugboard-tests
//!
//! # By category
//! cargo test -p plugboard-tests integration::lifecycle
//! cargo test -p plugboard-tests integration::unload
//!
//! # Benchmarks
//! cargo bench -p plugboard-tests
//! ```

#![allow(dead_code)]

pub mod helpers;
