//! Cycle-level cache and branch prediction model.
//!
//! This crate models the memory-hierarchy and branch-prediction logic of a pipelined processor:
//! 1. **Caches:** Direct-mapped instruction and data caches, each with a FIFO victim cache;
//!    the instruction side adds a stream buffer fed from hits.
//! 2. **Branch Prediction:** Local, gselect/gshare global and tournament predictors behind one
//!    interface, with a controller producing recovery addresses.
//! 3. **Memory:** A burst-transfer main memory with independent read and write channels.
//! 4. **Simulation:** A clocked system harness, trace replay, configuration and statistics.
//!
//! Every clocked component follows the same two-phase discipline: an `&self` evaluation
//! computes outputs and all next-state values from a frozen snapshot, and a `&mut self`
//! commit applies them at once.

/// Common types and utilities (line addresses, priority encoder, counters, errors).
pub mod common;
/// Model configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Caches and branch prediction units.
pub mod core;
/// Clocked system harness and trace replay.
pub mod sim;
/// Memory side: burst channel signals and main memory.
pub mod soc;
/// Statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Top-level clocked system; construct with `System::new`.
pub use crate::sim::System;
