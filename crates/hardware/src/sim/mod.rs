//! Simulation harness.
//!
//! Wires the caches, the burst memory and the branch controller into one
//! clocked system, and replays access traces through it.

/// Clocked top level and access helpers.
pub mod system;

/// Access trace format and parser.
pub mod trace;

pub use self::system::{Access, System, TickOutput};
pub use self::trace::TraceOp;
