//! Branch controller.
//!
//! Sits between the pipeline and the direction predictor: decode-time requests
//! become predicted fetch addresses, and execute-time outcomes become predictor
//! feedback plus, on a misprediction, the address fetch must recover to.

use super::{BranchPredictor, BranchPredictorWrapper, MetaMove, Prediction};
use crate::common::ConfigError;
use crate::common::constants::INSTRUCTION_SIZE;
use crate::config::PredictorConfig;
use crate::stats::BranchStats;

/// Result of resolving one branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The prior prediction disagreed with the outcome.
    pub mispredicted: bool,
    /// Correct next fetch address: the target if taken, else the fall-through.
    pub recovery: u32,
}

impl Resolution {
    /// Address fetch must redirect to, if the prediction was wrong.
    pub const fn redirect(&self) -> Option<u32> {
        if self.mispredicted {
            Some(self.recovery)
        } else {
            None
        }
    }
}

/// Predictor front end with statistics.
#[derive(Clone, Debug)]
pub struct BranchController {
    predictor: BranchPredictorWrapper,
    stats: BranchStats,
}

impl BranchController {
    /// Builds the configured predictor.
    ///
    /// # Errors
    ///
    /// Propagates predictor configuration faults.
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            predictor: BranchPredictorWrapper::new(config)?,
            stats: BranchStats::default(),
        })
    }

    /// The underlying predictor.
    pub const fn predictor(&self) -> &BranchPredictorWrapper {
        &self.predictor
    }

    /// Counters.
    pub const fn stats(&self) -> &BranchStats {
        &self.stats
    }

    /// Predicts the branch at `pc` with taken target `target`.
    pub fn request(&mut self, pc: u32, target: u32) -> Prediction {
        self.stats.lookups += 1;
        self.predictor.predict(pc, target)
    }

    /// Feeds back the outcome of a branch predicted as `prior`.
    pub fn resolve(&mut self, prior: &Prediction, taken: bool) -> Resolution {
        let recovery = if taken {
            prior.target
        } else {
            prior.pc.wrapping_add(INSTRUCTION_SIZE)
        };
        let mispredicted = prior.taken != taken;

        self.stats.feedbacks += 1;
        if mispredicted {
            self.stats.mispredictions += 1;
            tracing::debug!(pc = prior.pc, taken, recovery, "branch mispredicted");
        }
        if prior.local != prior.global {
            self.stats.disagreements += 1;
        }
        match self.predictor.feedback(prior, taken) {
            Some(MetaMove::TowardGlobal) => self.stats.meta_to_global += 1,
            Some(MetaMove::TowardLocal) => self.stats.meta_to_local += 1,
            None => {}
        }

        Resolution {
            mispredicted,
            recovery,
        }
    }

    /// Resets the predictor tables and clears counters.
    pub fn reset(&mut self) {
        self.predictor.reset();
        self.stats = BranchStats::default();
    }
}
