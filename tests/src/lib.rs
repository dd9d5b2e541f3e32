//! # MT Ledger Test Suite
//!
//! Unified test crate exercising the ledger through its public ports.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── scenarios.rs   # Reference scenarios and protocol properties
//!     ├── flows.rs       # Hooks, sinks, snapshots, threads
//!     └── properties.rs  # Randomised operation sequences
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p mt-tests
//!
//! # By category
//! cargo test -p mt-tests integration::scenarios::
//! cargo test -p mt-tests integration::properties::
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
