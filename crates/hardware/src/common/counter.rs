//! Saturating counters and history shift registers.
//!
//! These are the two state elements every predictor table is built from:
//! 1. **`SaturatingCounter`:** a 2-bit up/down counter clamped at `00` and `11`.
//! 2. **`ShiftRegister`:** a fixed-width outcome history. Advancing it yields an
//!    [`HistoryStep`] carrying both the pre-update and post-update values, so a
//!    caller can credit the table entry selected by the old history while the
//!    register moves on to the new one in the same step.

use super::addr::low_mask;

/// Two-bit saturating counter.
///
/// Values `10` and `11` predict taken; `00` and `01` predict not taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SaturatingCounter(u8);

impl SaturatingCounter {
    /// Largest counter value.
    pub const MAX: u8 = 0b11;
    /// Strongly not taken (`00`).
    pub const STRONG_NOT_TAKEN: Self = Self(0b00);
    /// Weakly not taken (`01`).
    pub const WEAK_NOT_TAKEN: Self = Self(0b01);
    /// Weakly taken (`10`), the reset value.
    pub const WEAK_TAKEN: Self = Self(0b10);
    /// Strongly taken (`11`).
    pub const STRONG_TAKEN: Self = Self(0b11);

    /// Creates a counter, clamping `value` into range.
    pub const fn new(value: u8) -> Self {
        if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// Raw 2-bit value.
    #[inline(always)]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// High bit of the counter.
    #[inline(always)]
    pub const fn high_bit(self) -> bool {
        self.0 & 0b10 != 0
    }

    /// Direction predicted by this counter.
    #[inline(always)]
    pub const fn predict(self) -> bool {
        self.high_bit()
    }

    /// Counter after one step towards `up`, saturating at either end.
    #[inline(always)]
    #[must_use]
    pub const fn stepped(self, up: bool) -> Self {
        if up {
            if self.0 < Self::MAX { Self(self.0 + 1) } else { self }
        } else if self.0 > 0 {
            Self(self.0 - 1)
        } else {
            self
        }
    }

    /// Moves the counter one step towards `taken`.
    #[inline(always)]
    pub const fn train(&mut self, taken: bool) {
        *self = self.stepped(taken);
    }

    /// True when the counter sits at either extreme.
    pub const fn is_saturated(self) -> bool {
        self.0 == 0 || self.0 == Self::MAX
    }
}

impl Default for SaturatingCounter {
    fn default() -> Self {
        Self::WEAK_TAKEN
    }
}

impl std::fmt::Display for SaturatingCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02b}", self.0)
    }
}

/// The two taps of a history register around one feedback event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryStep {
    /// History in effect before the outcome was shifted in; indexes the entry being credited.
    pub old: u32,
    /// History after the outcome was shifted in; indexes future predictions.
    pub new: u32,
}

/// Fixed-width outcome history, newest outcome in bit 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShiftRegister {
    value: u32,
    width: u32,
}

impl ShiftRegister {
    /// Creates a zeroed register of `width` bits (at most 32).
    pub const fn new(width: u32) -> Self {
        Self { value: 0, width }
    }

    /// Current history value.
    #[inline(always)]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Configured width in bits.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Computes the step produced by shifting `taken` in, without committing it.
    #[inline(always)]
    pub const fn advance(&self, taken: bool) -> HistoryStep {
        HistoryStep {
            old: self.value,
            new: ((self.value << 1) | taken as u32) & low_mask(self.width),
        }
    }

    /// Commits a previously computed step.
    #[inline(always)]
    pub const fn commit(&mut self, step: HistoryStep) {
        self.value = step.new;
    }

    /// Shifts `taken` in and returns the step taken.
    pub const fn shift(&mut self, taken: bool) -> HistoryStep {
        let step = self.advance(taken);
        self.commit(step);
        step
    }

    /// Clears the history.
    pub const fn reset(&mut self) {
        self.value = 0;
    }
}
