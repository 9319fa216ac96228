//! Local (per-address history) Branch Predictor.
//!
//! A two-level PAg predictor. The first level is a table of history shift
//! registers selected by low PC bits; the selected register's value indexes a
//! shared table of 2-bit saturating counters.

use super::branch_predictor::{BranchPredictor, MetaMove, Prediction};
use crate::common::addr::low_mask;
use crate::common::constants::WORD_SHIFT;
use crate::common::{HistoryStep, SaturatingCounter, ShiftRegister};

/// Next-state values of one local feedback event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalUpdate {
    /// History register trained.
    pub slot: usize,
    /// Pre-update and post-update history of that register.
    pub step: HistoryStep,
    /// New value of the counter indexed by `step.old`.
    pub counter: SaturatingCounter,
}

/// Per-address history predictor.
#[derive(Clone, Debug)]
pub struct LocalPredictor {
    /// History registers keyed by `pc[table_bits+1:2]`.
    histories: Vec<ShiftRegister>,
    /// Counters indexed by history value.
    counters: Vec<SaturatingCounter>,
    slot_mask: u32,
}

impl LocalPredictor {
    /// Creates a predictor with 2^`table_bits` history registers of
    /// `history_bits` bits and 2^`history_bits` counters.
    pub fn new(history_bits: u32, table_bits: u32) -> Self {
        Self {
            histories: vec![ShiftRegister::new(history_bits); 1 << table_bits],
            counters: vec![SaturatingCounter::WEAK_TAKEN; 1 << history_bits],
            slot_mask: low_mask(table_bits),
        }
    }

    /// History register selected by `pc`.
    #[inline(always)]
    pub const fn slot(&self, pc: u32) -> usize {
        ((pc >> WORD_SHIFT) & self.slot_mask) as usize
    }

    /// Current history for `pc`.
    pub fn history(&self, pc: u32) -> u32 {
        self.histories[self.slot(pc)].value()
    }

    /// Counter at `index`.
    pub fn counter(&self, index: usize) -> SaturatingCounter {
        self.counters[index]
    }

    /// Direction predicted for `pc` under current history.
    #[inline]
    pub fn lookup(&self, pc: u32) -> bool {
        self.counters[self.history(pc) as usize].predict()
    }

    /// Computes the update for a resolved branch without applying it.
    pub fn plan(&self, pc: u32, taken: bool) -> LocalUpdate {
        let slot = self.slot(pc);
        let step = self.histories[slot].advance(taken);
        LocalUpdate {
            slot,
            step,
            counter: self.counters[step.old as usize].stepped(taken),
        }
    }

    /// Applies a planned update.
    pub fn apply(&mut self, update: LocalUpdate) {
        self.counters[update.step.old as usize] = update.counter;
        self.histories[update.slot].commit(update.step);
    }

    /// Plans and applies an update, returning the history pair used.
    pub fn train(&mut self, pc: u32, taken: bool) -> HistoryStep {
        let update = self.plan(pc, taken);
        self.apply(update);
        update.step
    }
}

impl BranchPredictor for LocalPredictor {
    fn predict(&self, pc: u32, target: u32) -> Prediction {
        let taken = self.lookup(pc);
        Prediction {
            pc,
            target,
            taken,
            local: taken,
            global: taken,
            use_global: false,
        }
    }

    fn feedback(&mut self, prior: &Prediction, taken: bool) -> Option<MetaMove> {
        let _ = self.train(prior.pc, taken);
        None
    }

    fn reset(&mut self) {
        self.histories.iter_mut().for_each(ShiftRegister::reset);
        self.counters.fill(SaturatingCounter::WEAK_TAKEN);
    }
}
