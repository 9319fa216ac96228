//! Processor-side model components.
//!
//! This module contains the units that sit between the pipeline and memory:
//! the primary caches with their secondary structures, and the branch
//! prediction unit.

/// Caches and branch prediction.
pub mod units;

pub use self::units::bru::BranchController;
pub use self::units::cache::{DataCache, InstructionCache};
