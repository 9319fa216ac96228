
/// Read and write burst channel timing.
pub mod burst;

/// Latency controllers.
pub mod controller;
