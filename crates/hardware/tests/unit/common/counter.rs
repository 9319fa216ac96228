//! Saturating Counter and History Register Tests.
//!
//! Covers clamping, direction thresholds and the old/new pair produced when an
//! outcome is shifted into a history register.

use proptest::prelude::*;
use uarch_core::common::{HistoryStep, SaturatingCounter, ShiftRegister};

// ══════════════════════════════════════════════════════════
// 1. Saturating counter
// ══════════════════════════════════════════════════════════

#[test]
fn reset_value_is_weakly_taken() {
    let c = SaturatingCounter::default();
    assert_eq!(c, SaturatingCounter::WEAK_TAKEN);
    assert!(c.predict());
    assert_eq!(c.to_string(), "10");
}

#[test]
fn predict_follows_high_bit() {
    assert!(!SaturatingCounter::STRONG_NOT_TAKEN.predict());
    assert!(!SaturatingCounter::WEAK_NOT_TAKEN.predict());
    assert!(SaturatingCounter::WEAK_TAKEN.predict());
    assert!(SaturatingCounter::STRONG_TAKEN.predict());
}

#[test]
fn clamps_at_both_extremes() {
    assert_eq!(
        SaturatingCounter::STRONG_TAKEN.stepped(true),
        SaturatingCounter::STRONG_TAKEN
    );
    assert_eq!(
        SaturatingCounter::STRONG_NOT_TAKEN.stepped(false),
        SaturatingCounter::STRONG_NOT_TAKEN
    );
    assert_eq!(SaturatingCounter::new(9), SaturatingCounter::STRONG_TAKEN);
}

/// From the reset state two identical outcomes reach either extreme.
#[test]
fn weak_state_saturates_within_two_events() {
    for taken in [true, false] {
        let mut c = SaturatingCounter::WEAK_TAKEN;
        c.train(taken);
        c.train(taken);
        assert!(c.is_saturated());
        assert_eq!(c.predict(), taken);
    }
}

proptest! {
    #[test]
    fn three_identical_outcomes_always_saturate(start in 0u8..4, taken in any::<bool>()) {
        let mut c = SaturatingCounter::new(start);
        for _ in 0..3 {
            c.train(taken);
        }
        let expected = if taken {
            SaturatingCounter::STRONG_TAKEN
        } else {
            SaturatingCounter::STRONG_NOT_TAKEN
        };
        prop_assert_eq!(c, expected);
    }

    #[test]
    fn counter_stays_in_range(start in 0u8..4, outcomes in prop::collection::vec(any::<bool>(), 0..64)) {
        let mut c = SaturatingCounter::new(start);
        for taken in outcomes {
            c.train(taken);
            prop_assert!(c.value() <= SaturatingCounter::MAX);
        }
    }
}

// ══════════════════════════════════════════════════════════
// 2. History shift register
// ══════════════════════════════════════════════════════════

#[test]
fn shift_reports_old_and_new() {
    let mut h = ShiftRegister::new(3);
    assert_eq!(h.shift(true), HistoryStep { old: 0, new: 0b1 });
    assert_eq!(h.shift(false), HistoryStep { old: 0b1, new: 0b10 });
    assert_eq!(h.shift(true), HistoryStep { old: 0b10, new: 0b101 });
    assert_eq!(h.shift(true), HistoryStep { old: 0b101, new: 0b011 });
}

#[test]
fn advance_does_not_commit() {
    let h = ShiftRegister::new(4);
    let step = h.advance(true);
    assert_eq!(h.value(), 0);
    let mut h = h;
    h.commit(step);
    assert_eq!(h.value(), 1);
}

proptest! {
    /// The register always holds exactly the last `width` outcomes.
    #[test]
    fn holds_most_recent_outcomes(width in 1u32..16, outcomes in prop::collection::vec(any::<bool>(), 0..64)) {
        let mut h = ShiftRegister::new(width);
        for &taken in &outcomes {
            let _ = h.shift(taken);
        }
        let expected = outcomes
            .iter()
            .rev()
            .take(width as usize)
            .enumerate()
            .fold(0u32, |acc, (i, &t)| acc | (u32::from(t) << i));
        prop_assert_eq!(h.value(), expected);
    }
}
