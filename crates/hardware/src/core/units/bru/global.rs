//! Global-history Branch Predictor (gselect / gshare).
//!
//! A single global history register records the most recent resolved outcomes.
//! The counter table index combines that history with PC bits in one of two ways:
//!
//! - **gselect** (concatenation): `index = (ghr << P) | pc[P+1:2]`, where
//!   `P = table_bits - history_bits`. With the default 9-bit table and 5-bit
//!   history this is `(ghr[4:0] << 4) | pc[5:2]`.
//! - **gshare** (XOR): `index = pc[table_bits+1:2] ^ ghr`.

use super::branch_predictor::{BranchPredictor, MetaMove, Prediction};
use crate::common::addr::low_mask;
use crate::common::constants::WORD_SHIFT;
use crate::common::{HistoryStep, SaturatingCounter, ShiftRegister};
use crate::config::GlobalIndex;

/// Next-state values of one global feedback event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalUpdate {
    /// Counter trained, indexed with the pre-update history.
    pub index: usize,
    /// New counter value.
    pub counter: SaturatingCounter,
    /// Pre-update and post-update global history.
    pub step: HistoryStep,
}

/// Global history predictor.
#[derive(Clone, Debug)]
pub struct GlobalPredictor {
    ghr: ShiftRegister,
    counters: Vec<SaturatingCounter>,
    table_bits: u32,
    scheme: GlobalIndex,
}

impl GlobalPredictor {
    /// Creates a predictor with 2^`table_bits` counters and a `history_bits` history.
    ///
    /// The caller guarantees `history_bits <= table_bits` (strictly less for gselect);
    /// [`crate::config::PredictorConfig::validate`] checks this.
    pub fn new(table_bits: u32, history_bits: u32, scheme: GlobalIndex) -> Self {
        Self {
            ghr: ShiftRegister::new(history_bits),
            counters: vec![SaturatingCounter::WEAK_TAKEN; 1 << table_bits],
            table_bits,
            scheme,
        }
    }

    /// Index function in use.
    pub const fn scheme(&self) -> GlobalIndex {
        self.scheme
    }

    /// Current global history.
    pub const fn history(&self) -> u32 {
        self.ghr.value()
    }

    /// Counter at `index`.
    pub fn counter(&self, index: usize) -> SaturatingCounter {
        self.counters[index]
    }

    /// Table index for `pc` under an explicit `history` value.
    pub const fn index_with(&self, pc: u32, history: u32) -> usize {
        let word = pc >> WORD_SHIFT;
        let index = match self.scheme {
            GlobalIndex::GSelect => {
                let pc_bits = self.table_bits - self.ghr.width();
                (history << pc_bits) | (word & low_mask(pc_bits))
            }
            GlobalIndex::GShare => word ^ history,
        };
        (index & low_mask(self.table_bits)) as usize
    }

    /// Table index for `pc` under current history.
    #[inline]
    pub const fn index(&self, pc: u32) -> usize {
        self.index_with(pc, self.ghr.value())
    }

    /// Direction predicted for `pc`.
    #[inline]
    pub fn lookup(&self, pc: u32) -> bool {
        self.counters[self.index(pc)].predict()
    }

    /// Computes the update for a resolved branch without applying it.
    pub fn plan(&self, pc: u32, taken: bool) -> GlobalUpdate {
        let step = self.ghr.advance(taken);
        let index = self.index_with(pc, step.old);
        GlobalUpdate {
            index,
            counter: self.counters[index].stepped(taken),
            step,
        }
    }

    /// Applies a planned update.
    pub fn apply(&mut self, update: GlobalUpdate) {
        self.counters[update.index] = update.counter;
        self.ghr.commit(update.step);
    }

    /// Plans and applies an update, returning the history pair used.
    pub fn train(&mut self, pc: u32, taken: bool) -> HistoryStep {
        let update = self.plan(pc, taken);
        self.apply(update);
        update.step
    }
}

impl BranchPredictor for GlobalPredictor {
    fn predict(&self, pc: u32, target: u32) -> Prediction {
        let taken = self.lookup(pc);
        Prediction {
            pc,
            target,
            taken,
            local: taken,
            global: taken,
            use_global: true,
        }
    }

    fn feedback(&mut self, prior: &Prediction, taken: bool) -> Option<MetaMove> {
        let _ = self.train(prior.pc, taken);
        None
    }

    fn reset(&mut self) {
        self.ghr.reset();
        self.counters.fill(SaturatingCounter::WEAK_TAKEN);
    }
}
