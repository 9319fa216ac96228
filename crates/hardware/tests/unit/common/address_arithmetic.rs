//! Line Geometry Unit Tests.
//!
//! Verifies the split of byte addresses into tag, index and word offset, and
//! the reverse mapping from line addresses back to burst base addresses.

use proptest::prelude::*;
use rstest::rstest;
use uarch_core::common::{LineAddr, LineGeometry};

// ══════════════════════════════════════════════════════════
// 1. Field extraction
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(8, 2, 20, 4)]
#[case(2, 1, 27, 2)]
#[case(10, 3, 17, 8)]
fn widths_follow_configuration(
    #[case] index_bits: u32,
    #[case] offset_bits: u32,
    #[case] tag_bits: u32,
    #[case] line_words: usize,
) {
    let g = LineGeometry::new(32, index_bits, offset_bits);
    assert_eq!(g.tag_bits(), tag_bits);
    assert_eq!(g.line_words(), line_words);
    assert_eq!(g.depth(), 1 << index_bits);
}

/// Default geometry: 256 slots of 4 words, so lines repeat every 4 KiB.
#[test]
fn default_geometry_fields() {
    let g = LineGeometry::new(32, 8, 2);
    let addr = 0x0000_3A5C;
    assert_eq!(g.offset(addr), 3);
    assert_eq!(g.index(addr), 0xA5);
    assert_eq!(g.tag(addr), 0x3);
    assert_eq!(g.line(addr), LineAddr(0x3A5));
}

#[test]
fn conflicting_addresses_share_index_not_tag() {
    let g = LineGeometry::new(32, 8, 2);
    let a = 0x0000_0040;
    let b = a + 4096;
    assert_eq!(g.index(a), g.index(b));
    assert_ne!(g.tag(a), g.tag(b));
    assert_ne!(g.line(a), g.line(b));
}

#[test]
fn byte_bits_do_not_change_the_word() {
    let g = LineGeometry::new(32, 4, 2);
    assert_eq!(g.offset(0x104), g.offset(0x107));
    assert_eq!(g.line(0x104), g.line(0x107));
}

// ══════════════════════════════════════════════════════════
// 2. Rebuilding line addresses
// ══════════════════════════════════════════════════════════

#[test]
fn base_address_clears_offset() {
    let g = LineGeometry::new(32, 8, 2);
    assert_eq!(g.base(g.line(0x1234_567C)), 0x1234_5670);
}

proptest! {
    #[test]
    fn line_of_inverts_tag_and_index(addr in any::<u32>(), index_bits in 1u32..12, offset_bits in 1u32..4) {
        let g = LineGeometry::new(32, index_bits, offset_bits);
        let line = g.line(addr);
        prop_assert_eq!(g.line_of(g.tag(addr), g.index(addr)), line);
        prop_assert_eq!(g.line_index(line), g.index(addr));
        prop_assert_eq!(g.line_tag(line), g.tag(addr));
        prop_assert_eq!(g.line(g.base(line)), line);
    }
}
