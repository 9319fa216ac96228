//! Memory-side components.
//!
//! This module organizes the parts of the model outside the caches: the burst
//! channel signal definitions and the main memory that answers them.

/// Burst channel request/response signals.
pub mod bus;

/// Burst-transfer main memory, backing store and latency controllers.
pub mod memory;

pub use bus::{BurstRequest, BusRequest, BusResponse};
pub use memory::BurstMemory;
