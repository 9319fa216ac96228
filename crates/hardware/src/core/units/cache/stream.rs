//! Instruction stream buffer.
//!
//! A small FIFO of lines the instruction cache has recently hit on. Every hit
//! writes the line it served; a later miss on a line still present here is
//! served by copying it back instead of going to memory. Straight-line code
//! revisited after a conflict eviction is the case this covers.

use crate::common::{Encoded, LineAddr};

use super::associative::{AssociativeBuffer, BufferEntry, InsertOutcome};
use super::line_store::LineData;

/// FIFO fully-associative store of recently hit lines.
#[derive(Clone, Debug)]
pub struct StreamBuffer {
    lines: AssociativeBuffer,
}

impl StreamBuffer {
    /// Creates an empty stream buffer.
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

    /// Records the line a hit was served from.
    pub fn insert(&mut self, line: LineAddr, data: LineData) -> InsertOutcome {
        self.lines.insert(line, data)
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
