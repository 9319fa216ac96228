//! Fully-associative line buffer with FIFO replacement.
//!
//! The storage shared by the victim cache and the stream buffer. Lookup compares
//! a line address against every entry in parallel and reduces the match vector
//! with the priority encoder. Inserting a line that is already present refreshes
//! that entry in place; any other insert lands in the slot under the FIFO pointer,
//! which then advances.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `lookup()`: O(N)
//!   - `insert()`: O(N) (match search), O(1) replacement
//! - **Space Complexity:** O(N) lines
//! - **Hardware Cost:** One comparator per entry plus a single round-robin counter

use crate::common::LineAddr;
use crate::common::encoder::{self, Encoded};

use super::line_store::LineData;

/// One slot of the buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BufferEntry {
    /// Line address held by the slot.
    pub line: LineAddr,
    /// Line contents.
    pub data: LineData,
    /// Slot holds a line.
    pub valid: bool,
}

/// What an insert did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The line was already present; its slot was overwritten and the pointer held.
    Refreshed {
        /// Slot refreshed.
        slot: usize,
    },
    /// The line went into the FIFO slot and the pointer advanced.
    Filled {
        /// Slot written.
        slot: usize,
        /// Line that previously occupied the slot.
        displaced: Option<LineAddr>,
    },
}

/// Round-robin replacement pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct FifoPointer {
    next: usize,
    slots: usize,
}

impl FifoPointer {
    const fn new(slots: usize) -> Self {
        Self { next: 0, slots }
    }

    const fn victim(&self) -> usize {
        self.next
    }

    const fn advance(&mut self) {
        self.next = (self.next + 1) % self.slots;
    }
}

/// Fully-associative buffer of cache lines.
#[derive(Clone, Debug)]
pub struct AssociativeBuffer {
    entries: Vec<BufferEntry>,
    pointer: FifoPointer,
    line_words: usize,
}

impl AssociativeBuffer {
    /// Creates an empty buffer of `capacity` lines, each `line_words` words wide.
    pub fn new(capacity: usize, line_words: usize) -> Self {
        let empty = BufferEntry {
            data: LineData::zeroed(line_words),
            ..BufferEntry::default()
        };
        Self {
            entries: vec![empty; capacity],
            pointer: FifoPointer::new(capacity),
            line_words,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Words per line.
    pub const fn line_words(&self) -> usize {
        self.line_words
    }

    /// Slot the next non-refreshing insert will write.
    pub const fn pointer(&self) -> usize {
        self.pointer.victim()
    }

    /// Match vector for `line`: one flag per slot, set where a valid entry holds it.
    pub fn matches(&self, line: LineAddr) -> impl Iterator<Item = bool> + '_ {
        self.entries.iter().map(move |e| e.valid && e.line == line)
    }

    /// Priority-encoded lookup of `line`.
    pub fn lookup(&self, line: LineAddr) -> Encoded {
        encoder::encode(self.matches(line))
    }

    /// Slot holding `line`, if any.
    #[inline]
    pub fn find(&self, line: LineAddr) -> Option<usize> {
        self.lookup(line).get()
    }

    /// Entry at `slot`.
    pub fn entry(&self, slot: usize) -> &BufferEntry {
        &self.entries[slot]
    }

    /// Contents of `slot`.
    pub fn read(&self, slot: usize) -> LineData {
        self.entries[slot].data
    }

    /// All slots in order.
    pub fn entries(&self) -> &[BufferEntry] {
        &self.entries
    }

    /// Number of valid slots.
    pub fn occupancy(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }

    /// Writes `line` into the buffer.
    pub fn insert(&mut self, line: LineAddr, data: LineData) -> InsertOutcome {
        let fresh = BufferEntry {
            line,
            data,
            valid: true,
        };
        if let Some(slot) = self.find(line) {
            self.entries[slot] = fresh;
            return InsertOutcome::Refreshed { slot };
        }
        let slot = self.pointer.victim();
        let old = self.entries[slot];
        self.entries[slot] = fresh;
        self.pointer.advance();
        InsertOutcome::Filled {
            slot,
            displaced: old.valid.then_some(old.line),
        }
    }

    /// Overwrites one word of the line in `slot`.
    pub fn write_word(&mut self, slot: usize, offset: usize, value: u32) {
        self.entries[slot].data.set_word(offset, value);
    }

    /// Invalidates every slot and rewinds the pointer.
    pub fn reset(&mut self) {
        for e in &mut self.entries {
            *e = BufferEntry {
                data: LineData::zeroed(self.line_words),
                ..BufferEntry::default()
            };
        }
        self.pointer = FifoPointer::new(self.entries.len());
    }
}
