//! Line address types and cache address decomposition.
//!
//! This module defines the address arithmetic shared by every cache structure. It provides:
//! 1. **Line Addresses:** A strong type for full-line addresses (tag and index, no offset),
//!    the key used by the victim cache and the stream buffer.
//! 2. **Geometry:** Splitting a byte address into tag, index and word offset for a
//!    direct-mapped cache, and rebuilding line base addresses for memory bursts.

use super::constants::WORD_SHIFT;

/// A full-line address: the byte address with the word offset and byte bits removed.
///
/// Two byte addresses map to the same `LineAddr` exactly when they fall in the
/// same cache line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineAddr(pub u32);

impl LineAddr {
    /// Returns the raw line number.
    #[inline(always)]
    pub const fn val(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for LineAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{:#x}", self.0)
    }
}

/// Returns a mask with the low `bits` bits set.
#[inline(always)]
pub const fn low_mask(bits: u32) -> u32 {
    if bits >= u32::BITS {
        u32::MAX
    } else {
        (1 << bits) - 1
    }
}

/// Address layout of a direct-mapped cache.
///
/// A byte address is split, from the least significant bit upwards, into the
/// byte-within-word bits, `offset_bits` of word offset, `index_bits` of index,
/// and the remaining `tag_bits` of tag.
///
/// ```text
///  address_bits-1                                      0
/// +----------------+-------------+--------------+------+
/// |      tag       |    index    | word offset  | byte |
/// +----------------+-------------+--------------+------+
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineGeometry {
    index_bits: u32,
    offset_bits: u32,
    tag_bits: u32,
}

impl LineGeometry {
    /// Builds a geometry from already validated widths.
    ///
    /// Construction-time checks live in [`crate::config::CacheConfig::validate`];
    /// this constructor only derives the tag width.
    pub const fn new(address_bits: u32, index_bits: u32, offset_bits: u32) -> Self {
        Self {
            index_bits,
            offset_bits,
            tag_bits: address_bits - index_bits - offset_bits - WORD_SHIFT,
        }
    }

    /// Number of words in one line.
    #[inline(always)]
    pub const fn line_words(&self) -> usize {
        1 << self.offset_bits
    }

    /// Number of primary-cache slots.
    #[inline(always)]
    pub const fn depth(&self) -> usize {
        1 << self.index_bits
    }

    /// Width of the stored tag in bits.
    pub const fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Width of the index in bits.
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Width of the word offset in bits.
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    #[inline(always)]
    const fn line_shift(&self) -> u32 {
        self.offset_bits + WORD_SHIFT
    }

    /// Word offset of `addr` within its line.
    #[inline(always)]
    pub const fn offset(&self, addr: u32) -> usize {
        ((addr >> WORD_SHIFT) & low_mask(self.offset_bits)) as usize
    }

    /// Primary-cache index of `addr`.
    #[inline(always)]
    pub const fn index(&self, addr: u32) -> usize {
        ((addr >> self.line_shift()) & low_mask(self.index_bits)) as usize
    }

    /// Tag of `addr`.
    #[inline(always)]
    pub const fn tag(&self, addr: u32) -> u32 {
        let shift = self.line_shift() + self.index_bits;
        if shift >= u32::BITS {
            0
        } else {
            (addr >> shift) & low_mask(self.tag_bits)
        }
    }

    /// Full-line address of `addr`.
    #[inline(always)]
    pub const fn line(&self, addr: u32) -> LineAddr {
        LineAddr((addr >> self.line_shift()) & low_mask(self.tag_bits + self.index_bits))
    }

    /// Rebuilds the line address held by slot `index` under `tag`.
    #[inline(always)]
    pub const fn line_of(&self, tag: u32, index: usize) -> LineAddr {
        LineAddr((tag << self.index_bits) | index as u32)
    }

    /// Byte address of the first word of `line`, as sent on a memory burst.
    #[inline(always)]
    pub const fn base(&self, line: LineAddr) -> u32 {
        line.0 << self.line_shift()
    }

    /// Index bits of a line address.
    #[inline(always)]
    pub const fn line_index(&self, line: LineAddr) -> usize {
        (line.0 & low_mask(self.index_bits)) as usize
    }

    /// Tag bits of a line address.
    #[inline(always)]
    pub const fn line_tag(&self, line: LineAddr) -> u32 {
        line.0 >> self.index_bits
    }
}
