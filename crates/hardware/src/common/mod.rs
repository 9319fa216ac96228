//! Common utilities and types used throughout the model.
//!
//! This module provides the building blocks shared by the caches and the
//! branch predictor. It includes:
//! 1. **Address Types:** Line addresses and direct-mapped address decomposition.
//! 2. **Constants:** Word width, burst limits and instruction size.
//! 3. **Priority Encoder:** One-hot match vector to index conversion.
//! 4. **Counters:** Saturating counters and history shift registers.
//! 5. **Error Handling:** Configuration faults and trace/replay errors.

/// Line address type and cache address geometry.
pub mod addr;

/// Common constants used throughout the model.
pub mod constants;

/// Saturating counters and history registers.
pub mod counter;

/// Priority encoder for associative match vectors.
pub mod encoder;

/// Configuration fault and harness error definitions.
pub mod error;

pub use addr::{LineAddr, LineGeometry};
pub use counter::{HistoryStep, SaturatingCounter, ShiftRegister};
pub use encoder::Encoded;
pub use error::{ConfigError, SimError, TraceError};
