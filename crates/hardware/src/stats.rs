//! Model statistics collection and reporting.
//!
//! This module tracks performance counters for the model. It provides:
//! 1. **Caches:** Hits, misses and how each miss was served (victim restore,
//!    stream restore, memory refill, dirty flush).
//! 2. **Branch prediction:** Lookups, feedback events, mispredictions and
//!    meta-selector movement.
//! 3. **Reporting:** A plain-text report and `serde` serialization for JSON output.

use serde::Serialize;

use crate::soc::memory::PortStats;

/// Counters kept by one primary cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Cycles a request was answered from the primary cache.
    pub hits: u64,
    /// Requests that started a miss sequence.
    pub misses: u64,
    /// Store hits (data cache only).
    pub stores: u64,
    /// Misses served by copying a line back from the victim cache.
    pub victim_restores: u64,
    /// Misses served by copying a line back from the stream buffer.
    pub stream_restores: u64,
    /// Lines brought in by a memory burst read.
    pub refills: u64,
    /// Dirty lines written back to memory.
    pub flushes: u64,
    /// Evicted lines pushed into the victim cache.
    pub victim_inserts: u64,
    /// Hit lines written into the stream buffer.
    pub stream_inserts: u64,
}

impl CacheStats {
    /// Requests served.
    ///
    /// A request that misses is served by a hit once its line is in place, so
    /// every request is counted exactly once in `hits`.
    pub const fn accesses(&self) -> u64 {
        self.hits
    }

    /// Percentage of requests served without a miss, or zero before the first access.
    pub fn hit_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            (total.saturating_sub(self.misses) as f64 / total as f64) * 100.0
        }
    }
}

/// Counters kept by the branch predictor front end.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BranchStats {
    /// Prediction requests.
    pub lookups: u64,
    /// Resolved outcomes fed back.
    pub feedbacks: u64,
    /// Feedback events whose prior prediction was wrong.
    pub mispredictions: u64,
    /// Feedback events where the two tournament components disagreed.
    pub disagreements: u64,
    /// Meta-selector steps towards the global component.
    pub meta_to_global: u64,
    /// Meta-selector steps towards the local component.
    pub meta_to_local: u64,
}

impl BranchStats {
    /// Prediction accuracy over resolved branches, in percent.
    pub fn accuracy(&self) -> f64 {
        if self.feedbacks == 0 {
            0.0
        } else {
            let correct = self.feedbacks - self.mispredictions;
            (correct as f64 / self.feedbacks as f64) * 100.0
        }
    }
}

/// Snapshot of every counter in a running system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SimStats {
    /// Cycles simulated.
    pub cycles: u64,
    /// Cycles the fetch side waited on the instruction cache.
    pub fetch_stall_cycles: u64,
    /// Cycles the execute side waited on the data cache.
    pub data_stall_cycles: u64,
    /// Instruction cache counters.
    pub icache: CacheStats,
    /// Data cache counters.
    pub dcache: CacheStats,
    /// Instruction-side memory port counters.
    pub imem: PortStats,
    /// Data-side memory port counters.
    pub dmem: PortStats,
    /// Branch predictor counters.
    pub branch: BranchStats,
}

impl SimStats {
    /// Prints the selected report sections to stdout.
    ///
    /// Known sections are `summary`, `icache`, `dcache` and `branch`; an empty
    /// list prints everything.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let cyc = self.cycles.max(1);

        if want("summary") {
            println!("\n==========================================================");
            println!("CACHE / BRANCH MODEL STATISTICS");
            println!("==========================================================");
            println!("sim_cycles               {}", self.cycles);
            println!(
                "stalls.fetch             {} ({:.2}%)",
                self.fetch_stall_cycles,
                (self.fetch_stall_cycles as f64 / cyc as f64) * 100.0
            );
            println!(
                "stalls.data              {} ({:.2}%)",
                self.data_stall_cycles,
                (self.data_stall_cycles as f64 / cyc as f64) * 100.0
            );
            println!("----------------------------------------------------------");
        }
        if want("icache") {
            Self::print_cache("L1-I", &self.icache, &self.imem);
        }
        if want("dcache") {
            Self::print_cache("L1-D", &self.dcache, &self.dmem);
        }
        if want("branch") {
            println!("BRANCH PREDICTION");
            println!("  bp.lookups             {}", self.branch.lookups);
            println!("  bp.resolved            {}", self.branch.feedbacks);
            println!("  bp.mispredicts         {}", self.branch.mispredictions);
            println!("  bp.accuracy            {:.2}%", self.branch.accuracy());
            println!("  bp.disagreements       {}", self.branch.disagreements);
            println!(
                "  bp.meta                {} to global, {} to local",
                self.branch.meta_to_global, self.branch.meta_to_local
            );
            println!("----------------------------------------------------------");
        }
        println!("==========================================================");
    }

    fn print_cache(name: &str, cache: &CacheStats, port: &PortStats) {
        println!("{name}");
        println!(
            "  accesses               {} ({:.2}% hit)",
            cache.accesses(),
            cache.hit_rate()
        );
        println!("  misses                 {}", cache.misses);
        println!("  victim_restores        {}", cache.victim_restores);
        println!("  stream_restores        {}", cache.stream_restores);
        println!("  refills                {}", cache.refills);
        println!("  flushes                {}", cache.flushes);
        println!("  stores                 {}", cache.stores);
        println!(
            "  mem.bursts             {} read, {} write",
            port.read_bursts, port.write_bursts
        );
        println!("----------------------------------------------------------");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
