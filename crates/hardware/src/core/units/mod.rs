//! Functional units.
//!
//! This module contains the branch prediction unit and the direct-mapped cache
//! system with its victim caches and stream buffer.

/// Branch prediction unit: direction predictors and branch controller.
pub mod bru;

/// Direct-mapped L1 caches with victim cache and stream buffer.
pub mod cache;
