//! Global Model Constants.
//!
//! This module defines constants shared by the caches, the memory model and
//! the branch predictor. It includes:
//! 1. **Word Constants:** Word width and the byte-to-word shift.
//! 2. **Burst Limits:** The line sizes a memory burst can carry.
//! 3. **Instruction Constants:** Fall-through distance for branch recovery.

/// Width of one memory word in bytes (32-bit words).
pub const WORD_BYTES: u32 = 4;

/// Number of bits to shift to convert between byte and word addresses.
pub const WORD_SHIFT: u32 = 2;

/// Smallest line a burst transfer carries, in words.
pub const MIN_LINE_WORDS: usize = 2;

/// Largest line a burst transfer carries, in words.
pub const MAX_LINE_WORDS: usize = 8;

/// Size of an instruction in bytes; a not-taken branch falls through by this much.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Upper bound on the capacity of a fully-associative secondary structure.
pub const MAX_SECONDARY_ENTRIES: usize = 1024;
