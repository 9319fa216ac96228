//! Branch prediction unit (BRU) implementations.
//!
//! This module contains the direction predictors (local, global gselect/gshare,
//! and the tournament combining them) and the branch controller that turns
//! predictions into fetch redirects.

pub use self::branch_predictor::{BranchPredictor, MetaMove, Prediction};
pub use self::controller::{BranchController, Resolution};

/// Branch predictor trait and prediction record.
pub mod branch_predictor;

/// Prediction-to-redirect glue and branch statistics.
pub mod controller;

/// Global history predictor (gselect and gshare index functions).
pub mod global;

/// Per-address history predictor.
pub mod local;

/// Tournament branch predictor (combines local and global predictors).
pub mod tournament;

use self::{global::GlobalPredictor, local::LocalPredictor, tournament::TournamentPredictor};
use crate::common::ConfigError;
use crate::config::{PredictorConfig, PredictorKind};

/// Enum wrapper for static dispatch of Branch Predictors.
/// This avoids vtable lookups in the critical fetch loop.
#[derive(Clone, Debug)]
pub enum BranchPredictorWrapper {
    /// Local and global combined by a meta-selector.
    Tournament(TournamentPredictor),
    /// Local predictor alone.
    Local(LocalPredictor),
    /// Global predictor alone (gselect or gshare).
    Global(GlobalPredictor),
}

impl BranchPredictorWrapper {
    /// Creates a new branch predictor wrapper based on configuration.
    ///
    /// # Errors
    ///
    /// Returns the table/history width fault found by [`PredictorConfig::validate`].
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let predictor = match config.kind {
            PredictorKind::Tournament => Self::Tournament(TournamentPredictor::new(config)),
            PredictorKind::Local => Self::Local(LocalPredictor::new(
                config.local_history_bits,
                config.local_table_bits,
            )),
            PredictorKind::GSelect | PredictorKind::GShare => Self::Global(GlobalPredictor::new(
                config.global_table_bits,
                config.global_history_bits,
                config.index_scheme(),
            )),
        };
        tracing::debug!(kind = ?config.kind, scheme = config.index_scheme().name(), "branch predictor built");
        Ok(predictor)
    }

    /// The tournament predictor, when that is the configured strategy.
    pub const fn as_tournament(&self) -> Option<&TournamentPredictor> {
        match self {
            Self::Tournament(bp) => Some(bp),
            _ => None,
        }
    }
}

impl BranchPredictor for BranchPredictorWrapper {
    #[inline(always)]
    fn predict(&self, pc: u32, target: u32) -> Prediction {
        match self {
            Self::Tournament(bp) => bp.predict(pc, target),
            Self::Local(bp) => bp.predict(pc, target),
            Self::Global(bp) => bp.predict(pc, target),
        }
    }

    #[inline(always)]
    fn feedback(&mut self, prior: &Prediction, taken: bool) -> Option<MetaMove> {
        match self {
            Self::Tournament(bp) => bp.feedback(prior, taken),
            Self::Local(bp) => bp.feedback(prior, taken),
            Self::Global(bp) => bp.feedback(prior, taken),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Tournament(bp) => bp.reset(),
            Self::Local(bp) => bp.reset(),
            Self::Global(bp) => bp.reset(),
        }
    }
}
