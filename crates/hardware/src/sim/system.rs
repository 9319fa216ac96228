//! System: owns both caches, the memory and the branch controller side by side.
//!
//! One [`System::tick`] is one clock edge for everything:
//! 1. Each memory port exposes its response from registered state.
//! 2. Both caches evaluate against those responses and commit.
//! 3. Each memory port commits, given what its cache drove.
//!
//! The access helpers ([`System::fetch`], [`System::load`], [`System::store`])
//! hold one request until it is served and report how many cycles it took.

use crate::common::{ConfigError, SimError};
use crate::config::Config;
use crate::core::units::bru::{BranchController, Resolution};
use crate::core::units::cache::{CacheInput, CacheOutput, CacheRequest, DataCache, InstructionCache};
use crate::sim::trace::TraceOp;
use crate::soc::memory::BurstMemory;
use crate::stats::SimStats;

/// Memory port the instruction cache is attached to.
pub const IMEM_PORT: usize = 0;
/// Memory port the data cache is attached to.
pub const DMEM_PORT: usize = 1;

/// Upper bound on the cycles a single access may take before the harness gives up.
pub const MAX_ACCESS_CYCLES: u64 = 100_000;

/// Outputs of both caches for one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutput {
    /// Instruction cache outputs.
    pub fetch: CacheOutput,
    /// Data cache outputs.
    pub data: CacheOutput,
}

/// A completed access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    /// Word returned (for a store, the word before the write).
    pub data: u32,
    /// Cycles from presenting the request to the cycle it was served, inclusive.
    pub cycles: u64,
}

/// Top-level model: caches, memory and branch controller.
#[derive(Debug)]
pub struct System {
    icache: InstructionCache,
    dcache: DataCache,
    memory: BurstMemory,
    branch: BranchController,
    /// Address the instruction read port samples on idle cycles.
    fetch_next: u32,
    /// Address the data read port samples on idle cycles.
    data_next: u32,
    cycles: u64,
    fetch_stall_cycles: u64,
    data_stall_cycles: u64,
}

impl System {
    /// Builds the system described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the first configuration fault found.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            icache: InstructionCache::new(&config.icache, &config.memory)?,
            dcache: DataCache::new(&config.dcache, &config.memory)?,
            memory: BurstMemory::new(&config.memory, 2),
            branch: BranchController::new(&config.predictor)?,
            fetch_next: 0,
            data_next: 0,
            cycles: 0,
            fetch_stall_cycles: 0,
            data_stall_cycles: 0,
        })
    }

    /// Instruction cache.
    pub const fn icache(&self) -> &InstructionCache {
        &self.icache
    }

    /// Data cache.
    pub const fn dcache(&self) -> &DataCache {
        &self.dcache
    }

    /// Main memory.
    pub const fn memory(&self) -> &BurstMemory {
        &self.memory
    }

    /// Main memory, for preloading contents.
    pub const fn memory_mut(&mut self) -> &mut BurstMemory {
        &mut self.memory
    }

    /// Branch controller.
    pub const fn branch(&self) -> &BranchController {
        &self.branch
    }

    /// Cycles simulated so far.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Advances every component by one clock cycle.
    ///
    /// The `bus` field of each input is replaced with the response of the
    /// cache's memory port.
    pub fn tick(&mut self, fetch: CacheInput, data: CacheInput) -> TickOutput {
        let fetch = CacheInput {
            bus: self.memory.response(IMEM_PORT),
            ..fetch
        };
        let data = CacheInput {
            bus: self.memory.response(DMEM_PORT),
            ..data
        };

        let out = TickOutput {
            fetch: self.icache.step(&fetch),
            data: self.dcache.step(&data),
        };

        self.memory.clock(IMEM_PORT, &out.fetch.bus);
        self.memory.clock(DMEM_PORT, &out.data.bus);

        self.cycles += 1;
        if fetch.request.is_some() && !out.fetch.valid {
            self.fetch_stall_cycles += 1;
        }
        if data.request.is_some() && !out.data.valid {
            self.data_stall_cycles += 1;
        }
        out
    }

    /// Fetches the instruction word at `addr`.
    ///
    /// # Errors
    ///
    /// [`SimError::AccessTimeout`] if the request is not served within
    /// [`MAX_ACCESS_CYCLES`].
    pub fn fetch(&mut self, addr: u32) -> Result<Access, SimError> {
        self.fetch_next = addr;
        let cache = self.icache.kind().name();
        let request = CacheRequest { addr, store: None };
        self.run_until(cache, addr, |sys| {
            let data_next = sys.data_next;
            let out = sys.tick(
                CacheInput {
                    request: Some(request),
                    addr_next: addr,
                    bus: Default::default(),
                },
                CacheInput::idle(data_next, Default::default()),
            );
            out.fetch.valid.then_some(out.fetch.data)
        })
    }

    /// Loads the data word at `addr`.
    ///
    /// # Errors
    ///
    /// [`SimError::AccessTimeout`] if the request is not served in time.
    pub fn load(&mut self, addr: u32) -> Result<Access, SimError> {
        self.data_access(CacheRequest { addr, store: None })
    }

    /// Stores `value` at `addr`.
    ///
    /// # Errors
    ///
    /// [`SimError::AccessTimeout`] if the request is not served in time.
    pub fn store(&mut self, addr: u32, value: u32) -> Result<Access, SimError> {
        self.data_access(CacheRequest {
            addr,
            store: Some(value),
        })
    }

    fn data_access(&mut self, request: CacheRequest) -> Result<Access, SimError> {
        let addr = request.addr;
        self.data_next = addr;
        let cache = self.dcache.kind().name();
        self.run_until(cache, addr, |sys| {
            let fetch_next = sys.fetch_next;
            let out = sys.tick(
                CacheInput::idle(fetch_next, Default::default()),
                CacheInput {
                    request: Some(request),
                    addr_next: addr,
                    bus: Default::default(),
                },
            );
            out.data.valid.then_some(out.data.data)
        })
    }

    fn run_until<F>(
        &mut self,
        cache: &'static str,
        addr: u32,
        mut cycle: F,
    ) -> Result<Access, SimError>
    where
        F: FnMut(&mut Self) -> Option<u32>,
    {
        for n in 1..=MAX_ACCESS_CYCLES {
            if let Some(data) = cycle(self) {
                return Ok(Access { data, cycles: n });
            }
        }
        Err(SimError::AccessTimeout {
            cache,
            addr,
            cycles: MAX_ACCESS_CYCLES,
        })
    }

    /// Predicts and immediately resolves a conditional branch.
    pub fn branch_outcome(&mut self, pc: u32, target: u32, taken: bool) -> Resolution {
        let prediction = self.branch.request(pc, target);
        self.branch.resolve(&prediction, taken)
    }

    /// Replays one trace operation.
    ///
    /// # Errors
    ///
    /// Propagates access timeouts.
    pub fn apply(&mut self, op: TraceOp) -> Result<(), SimError> {
        match op {
            TraceOp::Fetch { addr } => {
                let _ = self.fetch(addr)?;
            }
            TraceOp::Load { addr } => {
                let _ = self.load(addr)?;
            }
            TraceOp::Store { addr, value } => {
                let _ = self.store(addr, value)?;
            }
            TraceOp::Branch { pc, target, taken } => {
                let _ = self.branch_outcome(pc, target, taken);
            }
        }
        Ok(())
    }

    /// Replays a whole trace.
    ///
    /// # Errors
    ///
    /// Stops at the first access timeout.
    pub fn replay<'a, I>(&mut self, ops: I) -> Result<(), SimError>
    where
        I: IntoIterator<Item = &'a TraceOp>,
    {
        for op in ops {
            self.apply(*op)?;
        }
        tracing::info!(cycles = self.cycles, "trace replay finished");
        Ok(())
    }

    /// Snapshot of every counter.
    pub fn stats(&self) -> SimStats {
        SimStats {
            cycles: self.cycles,
            fetch_stall_cycles: self.fetch_stall_cycles,
            data_stall_cycles: self.data_stall_cycles,
            icache: *self.icache.stats(),
            dcache: *self.dcache.stats(),
            imem: self.memory.port_stats(IMEM_PORT),
            dmem: self.memory.port_stats(DMEM_PORT),
            branch: *self.branch.stats(),
        }
    }

    /// Returns caches and predictor to their reset state. Memory contents are kept.
    pub fn reset(&mut self) {
        self.icache.reset();
        self.dcache.reset();
        self.branch.reset();
        self.fetch_next = 0;
        self.data_next = 0;
    }
}
