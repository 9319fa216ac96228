//! Sparse word storage backing the burst memory.
//!
//! Only words that have been written occupy host memory; every other word of
//! the address space reads as zero.

use std::collections::HashMap;

use crate::common::constants::WORD_BYTES;

/// Sparse, word-addressed backing store.
#[derive(Debug, Clone, Default)]
pub struct WordBuffer {
    words: HashMap<u32, u32>,
}

impl WordBuffer {
    /// Creates an empty (all-zero) buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the word containing byte address `addr`.
    #[inline]
    pub fn read(&self, addr: u32) -> u32 {
        self.words.get(&(addr & !(WORD_BYTES - 1))).copied().unwrap_or(0)
    }

    /// Writes the word containing byte address `addr`.
    #[inline]
    pub fn write(&mut self, addr: u32, value: u32) {
        let _ = self.words.insert(addr & !(WORD_BYTES - 1), value);
    }

    /// Loads consecutive words starting at `base`.
    pub fn load(&mut self, base: u32, words: &[u32]) {
        for (i, &w) in words.iter().enumerate() {
            self.write(base.wrapping_add(i as u32 * WORD_BYTES), w);
        }
    }

    /// Number of words that have been written.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
