//! Memory controller implementations for burst latency modeling.
//!
//! This module provides:
//! 1. **SimpleController:** Fixed latency per burst (no row-buffer modeling).
//! 2. **DramController:** Row-buffer-aware latency (CAS, RAS, precharge) for DRAM-style timing.
//!
//! The burst memory asks its controller once per accepted read request for the
//! number of cycles before the first data beat.

use crate::config::{MemoryConfig, MemoryControllerKind};

/// Trait for memory controller implementations that report access latency in cycles.
pub trait MemoryController: Send + Sync + std::fmt::Debug {
    /// Returns the number of cycles before the first beat of a burst starting at `addr`.
    fn access_latency(&mut self, addr: u32) -> u32;
}

/// Builds the controller selected by `config`.
pub fn from_config(config: &MemoryConfig) -> Box<dyn MemoryController> {
    match config.controller {
        MemoryControllerKind::Simple => Box::new(SimpleController::new(config.read_latency)),
        MemoryControllerKind::Dram => {
            Box::new(DramController::new(config.t_cas, config.t_ras, config.t_pre))
        }
    }
}

/// Fixed-latency memory controller; every burst takes the same number of cycles.
#[derive(Debug, Clone, Copy)]
pub struct SimpleController {
    latency: u32,
}

impl SimpleController {
    /// Creates a simple controller with the given fixed latency in cycles.
    pub const fn new(latency: u32) -> Self {
        Self { latency }
    }
}

impl MemoryController for SimpleController {
    fn access_latency(&mut self, _addr: u32) -> u32 {
        self.latency
    }
}

/// DRAM-style controller with a single open row; models CAS, RAS, and precharge latencies.
#[derive(Debug, Clone, Copy)]
pub struct DramController {
    last_row: Option<u32>,
    t_cas: u32,
    t_ras: u32,
    t_pre: u32,
    row_mask: u32,
}

impl DramController {
    /// Creates a DRAM controller with the given timing parameters (in cycles)
    /// and 2 KiB rows, with no row currently open.
    pub const fn new(t_cas: u32, t_ras: u32, t_pre: u32) -> Self {
        Self {
            last_row: None,
            t_cas,
            t_ras,
            t_pre,
            row_mask: !2047,
        }
    }
}

impl MemoryController for DramController {
    fn access_latency(&mut self, addr: u32) -> u32 {
        let row = addr & self.row_mask;
        match self.last_row {
            Some(open_row) if open_row == row => self.t_cas,
            Some(_) => {
                self.last_row = Some(row);
                self.t_pre + self.t_ras + self.t_cas
            }
            None => {
                self.last_row = Some(row);
                self.t_ras + self.t_cas
            }
        }
    }
}
