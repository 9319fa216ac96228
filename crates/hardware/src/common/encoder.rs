//! Priority encoder.
//!
//! Collapses a match vector (one bit per associative slot, or one bit per word
//! of a rotating write-enable) into the position of its lowest set bit plus a
//! valid flag. Both secondary structures and the restore sequencer share it.

/// Output of a priority encoder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Encoded {
    /// Position of the lowest set bit; zero when `valid` is false.
    pub index: usize,
    /// True when at least one bit was set.
    pub valid: bool,
}

impl Encoded {
    /// The encoded index when valid.
    #[inline(always)]
    pub const fn get(self) -> Option<usize> {
        if self.valid { Some(self.index) } else { None }
    }
}

/// Encodes a match vector of any width. The lowest set position wins.
///
/// Callers that maintain a one-hot invariant (at most one set bit) get the
/// unique matching position; wider vectors still encode deterministically.
pub fn encode<I>(matches: I) -> Encoded
where
    I: IntoIterator<Item = bool>,
{
    matches
        .into_iter()
        .position(|m| m)
        .map_or_else(Encoded::default, |index| Encoded { index, valid: true })
}

/// Encodes a packed bit vector (bit `i` = slot `i`).
#[inline(always)]
pub const fn encode_bits(bits: u64) -> Encoded {
    if bits == 0 {
        Encoded {
            index: 0,
            valid: false,
        }
    } else {
        Encoded {
            index: bits.trailing_zeros() as usize,
            valid: true,
        }
    }
}

/// True when exactly one element of the vector is set.
pub fn is_one_hot<I>(matches: I) -> bool
where
    I: IntoIterator<Item = bool>,
{
    matches.into_iter().filter(|&m| m).count() == 1
}
