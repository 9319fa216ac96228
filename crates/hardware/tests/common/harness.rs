use std::sync::{Arc, Mutex};

use uarch_core::config::{CacheConfig, MemoryConfig};
use uarch_core::core::units::cache::{
    CacheInput, CacheOutput, CacheRequest, CacheRole, DirectMappedCache, MissState,
};
use uarch_core::soc::memory::BurstMemory;

use crate::common::mocks::memory::MockMemoryController;

/// Upper bound on cycles a single harness access may take.
const ACCESS_LIMIT: usize = 1_000;

/// Builds a cache geometry for tests.
pub fn cache_config(
    index_bits: u32,
    offset_bits: u32,
    victim: usize,
    stream: Option<usize>,
) -> CacheConfig {
    CacheConfig {
        index_bits,
        offset_bits,
        victim_entries: Some(victim),
        stream_entries: stream,
    }
}

/// Clocks one cache against port 0 of a burst memory.
pub struct CacheHarness<R: CacheRole> {
    pub cache: DirectMappedCache<R>,
    pub memory: BurstMemory,
    /// State the cache was in on every cycle so far.
    pub states: Vec<MissState>,
    /// Read burst addresses seen by the memory controller.
    pub bursts: Arc<Mutex<Vec<u32>>>,
    /// Address the read port samples on idle cycles.
    pub idle_next: u32,
}

impl<R: CacheRole> CacheHarness<R> {
    /// Cache with the given geometry, memory with read latency 1.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_latency(config, 1)
    }

    pub fn with_latency(config: &CacheConfig, latency: u32) -> Self {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();

        let memory_config = MemoryConfig::default();
        let controller = MockMemoryController::new(latency);
        let bursts = controller.log();
        Self {
            cache: DirectMappedCache::new(config, &memory_config).unwrap(),
            memory: BurstMemory::with_controller(&memory_config, 1, Box::new(controller)),
            states: Vec::new(),
            bursts,
            idle_next: 0,
        }
    }

    /// Preloads memory words starting at `base`.
    pub fn fill(&mut self, base: u32, words: &[u32]) {
        self.memory.load(base, words);
    }

    /// One clock cycle.
    pub fn cycle(&mut self, request: Option<CacheRequest>, addr_next: u32) -> CacheOutput {
        let input = CacheInput {
            request,
            addr_next,
            bus: self.memory.response(0),
        };
        let out = self.cache.step(&input);
        self.memory.clock(0, &out.bus);
        self.states.push(out.state);
        out
    }

    /// One cycle with no request.
    pub fn idle(&mut self) -> CacheOutput {
        self.cycle(None, self.idle_next)
    }

    /// Holds a request until served; returns the word and the cycles taken.
    pub fn access(&mut self, addr: u32, store: Option<u32>) -> (u32, usize) {
        self.idle_next = addr;
        let request = CacheRequest { addr, store };
        for n in 1..=ACCESS_LIMIT {
            let out = self.cycle(Some(request), addr);
            if out.valid {
                return (out.data, n);
            }
        }
        panic!("access to {addr:#x} not served within {ACCESS_LIMIT} cycles");
    }

    pub fn read(&mut self, addr: u32) -> u32 {
        self.access(addr, None).0
    }

    pub fn write(&mut self, addr: u32, value: u32) {
        let _ = self.access(addr, Some(value));
    }

    /// Number of cycles recorded so far; pass to [`Self::states_since`].
    pub fn mark(&self) -> usize {
        self.states.len()
    }

    pub fn states_since(&self, mark: usize) -> &[MissState] {
        &self.states[mark..]
    }

    /// Whether any cycle since `mark` was spent in `state`.
    pub fn visited_since(&self, mark: usize, state: MissState) -> bool {
        self.states_since(mark).contains(&state)
    }

    /// Read bursts the memory has accepted.
    pub fn burst_count(&self) -> usize {
        self.bursts.lock().unwrap().len()
    }
}
