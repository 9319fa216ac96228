//! Tournament Branch Predictor.
//!
//! A hybrid predictor that uses a 2-bit meta-selector to choose between a Local
//! predictor (predictor 1) and a Global predictor (predictor 2). The selector is
//! trained only when the two components disagree, towards whichever one was right.

use super::branch_predictor::{BranchPredictor, MetaMove, Prediction};
use super::global::GlobalPredictor;
use super::local::LocalPredictor;
use crate::common::SaturatingCounter;
use crate::config::PredictorConfig;

/// Tournament Predictor structure.
#[derive(Clone, Debug)]
pub struct TournamentPredictor {
    /// Predictor 1.
    local: LocalPredictor,
    /// Predictor 2.
    global: GlobalPredictor,
    /// High bit set selects predictor 2.
    meta: SaturatingCounter,
}

impl TournamentPredictor {
    /// Creates a Tournament Predictor from the provided configuration.
    pub fn new(config: &PredictorConfig) -> Self {
        Self {
            local: LocalPredictor::new(config.local_history_bits, config.local_table_bits),
            global: GlobalPredictor::new(
                config.global_table_bits,
                config.global_history_bits,
                config.index_scheme(),
            ),
            meta: SaturatingCounter::WEAK_TAKEN,
        }
    }

    /// Local component.
    pub const fn local(&self) -> &LocalPredictor {
        &self.local
    }

    /// Global component.
    pub const fn global(&self) -> &GlobalPredictor {
        &self.global
    }

    /// Meta-selector counter.
    pub const fn meta(&self) -> SaturatingCounter {
        self.meta
    }

    /// Meta-selector movement implied by the component predictions and the outcome.
    const fn meta_move(prior: &Prediction, taken: bool) -> Option<MetaMove> {
        if prior.local == prior.global {
            None
        } else if prior.local == taken {
            Some(MetaMove::TowardLocal)
        } else {
            Some(MetaMove::TowardGlobal)
        }
    }
}

impl BranchPredictor for TournamentPredictor {
    fn predict(&self, pc: u32, target: u32) -> Prediction {
        let local = self.local.lookup(pc);
        let global = self.global.lookup(pc);
        let use_global = self.meta.high_bit();
        Prediction {
            pc,
            target,
            taken: if use_global { global } else { local },
            local,
            global,
            use_global,
        }
    }

    /// Trains both components and the selector from one snapshot.
    ///
    /// Each component's counter is indexed with its pre-update history while the
    /// history registers advance in the same step.
    fn feedback(&mut self, prior: &Prediction, taken: bool) -> Option<MetaMove> {
        let local = self.local.plan(prior.pc, taken);
        let global = self.global.plan(prior.pc, taken);
        let movement = Self::meta_move(prior, taken);
        let meta = match movement {
            Some(MetaMove::TowardGlobal) => self.meta.stepped(true),
            Some(MetaMove::TowardLocal) => self.meta.stepped(false),
            None => self.meta,
        };

        if meta != self.meta {
            tracing::trace!(pc = prior.pc, from = %self.meta, to = %meta, "meta selector moved");
        }
        self.local.apply(local);
        self.global.apply(global);
        self.meta = meta;
        movement
    }

    fn reset(&mut self) {
        self.local.reset();
        self.global.reset();
        self.meta = SaturatingCounter::WEAK_TAKEN;
    }
}
