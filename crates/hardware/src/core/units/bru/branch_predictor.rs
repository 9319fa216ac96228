//! Branch Predictor Interface.
//!
//! This module defines the `BranchPredictor` trait every direction predictor
//! implements, and the [`Prediction`] record that travels from the request port
//! to the feedback port so the predictor can be credited with what it said at
//! prediction time.

use crate::common::constants::INSTRUCTION_SIZE;

/// Direction the tournament meta-selector moved on a feedback event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MetaMove {
    /// Towards predictor 2 (global).
    TowardGlobal,
    /// Towards predictor 1 (local).
    TowardLocal,
}

/// Everything a predictor said about one branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Prediction {
    /// Address of the branch.
    pub pc: u32,
    /// Branch target supplied with the request.
    pub target: u32,
    /// Final direction.
    pub taken: bool,
    /// Predictor 1 (local) direction.
    pub local: bool,
    /// Predictor 2 (global) direction.
    pub global: bool,
    /// The meta-selector chose predictor 2.
    pub use_global: bool,
}

impl Prediction {
    /// Predicted next fetch address.
    #[inline]
    pub const fn next_pc(&self) -> u32 {
        if self.taken {
            self.target
        } else {
            self.pc.wrapping_add(INSTRUCTION_SIZE)
        }
    }
}

/// Trait for branch direction prediction algorithms.
pub trait BranchPredictor {
    /// Predicts the branch at `pc` whose taken target is `target`.
    ///
    /// Reads current state only; never fails.
    fn predict(&self, pc: u32, target: u32) -> Prediction;

    /// Trains the predictor with the resolved outcome of a branch.
    ///
    /// # Arguments
    ///
    /// * `prior` - The prediction made for this branch at request time
    /// * `taken` - Whether the branch was actually taken
    ///
    /// # Returns
    ///
    /// The meta-selector movement, for predictors that have one.
    fn feedback(&mut self, prior: &Prediction, taken: bool) -> Option<MetaMove>;

    /// Restores every counter to weakly taken and every history to zero.
    fn reset(&mut self);
}
