//! Victim cache.
//!
//! Holds lines recently evicted from a primary cache so that a conflict miss on
//! one of them can be served without a memory refill. On the data side it also
//! tracks store hits to lines it shares with the primary cache, so a restored
//! copy is never older than the line that was written.

use crate::common::{Encoded, LineAddr};

use super::associative::{AssociativeBuffer, BufferEntry, InsertOutcome};
use super::line_store::LineData;

/// FIFO fully-associative store of evicted lines.
#[derive(Clone, Debug)]
pub struct VictimCache {
    lines: AssociativeBuffer,
}

impl VictimCache {
    /// Creates an empty victim cache.
    pub fn new(entries: usize, line_words: usize) -> Self {
        Self {
            lines: AssociativeBuffer::new(entries, line_words),
        }
    }

    /// Priority-encoded lookup.
    #[inline]
    pub fn lookup(&self, line: LineAddr) -> Encoded {
        self.lines.lookup(line)
    }

    /// Contents of `slot`.
    pub fn read(&self, slot: usize) -> LineData {
        self.lines.read(slot)
    }

    /// Records an evicted line.
    pub fn insert(&mut self, line: LineAddr, data: LineData) -> InsertOutcome {
        self.lines.insert(line, data)
    }

    /// Mirrors a store into the copy held in `slot`.
    pub fn write_word(&mut self, slot: usize, offset: usize, value: u32) {
        self.lines.write_word(slot, offset, value);
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.lines.capacity()
    }

    /// All slots in order.
    pub fn entries(&self) -> &[BufferEntry] {
        self.lines.entries()
    }

    /// Slot the next fresh insert will use.
    pub const fn pointer(&self) -> usize {
        self.lines.pointer()
    }

    /// Invalidates all entries.
    pub fn reset(&mut self) {
        self.lines.reset();
    }
}
