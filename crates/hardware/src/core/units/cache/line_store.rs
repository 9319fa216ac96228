//! Synchronous line storage.
//!
//! The tag, valid, dirty and data banks of a direct-mapped cache. The store has
//! one read port and one write port per cycle. Reads are registered: the value
//! read during a cycle is visible through [`LineStore::registered`] on the next
//! cycle. A read and a write of the same slot in one cycle register the
//! post-write contents (write-first).

use crate::common::constants::MAX_LINE_WORDS;

/// The words of one cache line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LineData {
    words: [u32; MAX_LINE_WORDS],
    len: usize,
}

impl LineData {
    /// A zero-filled line of `len` words.
    pub const fn zeroed(len: usize) -> Self {
        Self {
            words: [0; MAX_LINE_WORDS],
            len,
        }
    }

    /// Builds a line from at most [`MAX_LINE_WORDS`] words.
    pub fn from_words(words: &[u32]) -> Self {
        let len = words.len().min(MAX_LINE_WORDS);
        let mut line = Self::zeroed(len);
        line.words[..len].copy_from_slice(&words[..len]);
        line
    }

    /// Number of words in the line.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length line.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Word at `offset`.
    #[inline(always)]
    pub const fn word(&self, offset: usize) -> u32 {
        self.words[offset]
    }

    /// Overwrites the word at `offset`.
    #[inline(always)]
    pub const fn set_word(&mut self, offset: usize, value: u32) {
        self.words[offset] = value;
    }

    /// The line's words.
    pub fn as_slice(&self) -> &[u32] {
        &self.words[..self.len]
    }
}

/// Registered output of the read port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LineRead {
    /// Slot that was read.
    pub index: usize,
    /// Stored tag.
    pub tag: u32,
    /// Valid bit.
    pub valid: bool,
    /// Dirty bit.
    pub dirty: bool,
    /// Stored words.
    pub data: LineData,
}

/// Effect of a write on a slot's tag and status bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TagWrite {
    /// Leave tag and status bits unchanged.
    #[default]
    Keep,
    /// Set the dirty bit (store hit).
    SetDirty,
    /// Clear the dirty bit (write-back finished).
    ClearDirty,
    /// Commit a new tag, set valid, clear dirty (last word of a fill).
    Fill {
        /// Tag of the line now held by the slot.
        tag: u32,
    },
}

/// One use of the write port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineWrite {
    /// Slot written.
    pub index: usize,
    /// Word offset and value written, if any.
    pub word: Option<(usize, u32)>,
    /// Tag and status update.
    pub tag: TagWrite,
}

/// Tag, status and data banks of a direct-mapped cache.
#[derive(Clone, Debug)]
pub struct LineStore {
    tags: Vec<u32>,
    valid: Vec<bool>,
    dirty: Vec<bool>,
    data: Vec<LineData>,
    read: LineRead,
}

impl LineStore {
    /// Creates a store of `depth` invalid lines of `line_words` words each.
    pub fn new(depth: usize, line_words: usize) -> Self {
        let mut store = Self {
            tags: vec![0; depth],
            valid: vec![false; depth],
            dirty: vec![false; depth],
            data: vec![LineData::zeroed(line_words); depth],
            read: LineRead::default(),
        };
        store.read = store.slot(0);
        store
    }

    /// Number of slots.
    pub fn depth(&self) -> usize {
        self.tags.len()
    }

    /// Output of last cycle's read.
    #[inline(always)]
    pub const fn registered(&self) -> &LineRead {
        &self.read
    }

    /// Current contents of `index`, outside the port model (inspection only).
    pub fn slot(&self, index: usize) -> LineRead {
        LineRead {
            index,
            tag: self.tags[index],
            valid: self.valid[index],
            dirty: self.dirty[index],
            data: self.data[index],
        }
    }

    /// Ends a cycle: applies this cycle's write, then registers the read of `read_index`.
    pub fn commit(&mut self, write: Option<LineWrite>, read_index: usize) {
        if let Some(w) = write {
            if let Some((offset, value)) = w.word {
                self.data[w.index].set_word(offset, value);
            }
            match w.tag {
                TagWrite::Keep => {}
                TagWrite::SetDirty => self.dirty[w.index] = true,
                TagWrite::ClearDirty => self.dirty[w.index] = false,
                TagWrite::Fill { tag } => {
                    self.tags[w.index] = tag;
                    self.valid[w.index] = true;
                    self.dirty[w.index] = false;
                }
            }
        }
        self.read = self.slot(read_index);
    }

    /// Invalidates every slot and clears the registered read.
    pub fn reset(&mut self) {
        self.tags.fill(0);
        self.valid.fill(false);
        self.dirty.fill(false);
        let words = self.data.first().map_or(0, LineData::len);
        self.data.fill(LineData::zeroed(words));
        self.read = self.slot(0);
    }
}
