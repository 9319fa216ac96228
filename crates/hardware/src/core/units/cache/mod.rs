//! Direct-mapped primary cache with victim cache and stream buffer.
//!
//! One implementation serves both the instruction and the data side; the role
//! type parameter selects whether stores, dirty tracking and write-back apply
//! (data) or a stream buffer is attached (instruction).
//!
//! Each cycle is split in two phases:
//! 1. [`DirectMappedCache::evaluate`] reads only registered state (the line
//!    store's registered read, the miss-handling registers, the secondary
//!    buffers) and returns the outputs plus every next-state value.
//! 2. [`DirectMappedCache::commit`] applies those values at once.
//!
//! # Miss handling
//!
//! A miss is served by the first source that applies:
//! 1. The victim cache (on the data side only while the resident line is clean).
//! 2. The stream buffer (instruction side only).
//! 3. A write-back of the dirty resident line (data side only), then a refill.
//! 4. A burst refill from memory.
//!
//! Whenever the resident line is valid it is pushed into the victim cache in the
//! cycle the miss is detected. Restores copy the captured source line one word
//! per cycle under a rotating one-hot write enable; the last word commits the
//! tag and valid bit.

/// Fully-associative FIFO storage shared by the secondary buffers.
pub mod associative;

/// Tag, status and data banks with a registered read port.
pub mod line_store;

/// Instruction-side stream buffer.
pub mod stream;

/// Victim cache of evicted lines.
pub mod victim;

use std::marker::PhantomData;

use self::line_store::{LineData, LineRead, LineStore, LineWrite, TagWrite};
use self::stream::StreamBuffer;
use self::victim::VictimCache;
use crate::common::addr::low_mask;
use crate::common::encoder::encode_bits;
use crate::common::{ConfigError, LineAddr, LineGeometry};
use crate::config::{CacheConfig, CacheKind, MemoryConfig};
use crate::soc::bus::{BurstRequest, BusRequest, BusResponse};
use crate::stats::CacheStats;

/// Static role of a primary cache.
pub trait CacheRole: std::fmt::Debug + Send + Sync + 'static {
    /// The cache kind this role stands for.
    const KIND: CacheKind;

    /// Whether the role accepts stores and writes dirty lines back.
    const WRITABLE: bool = matches!(Self::KIND, CacheKind::Data);
}

/// Instruction-side role: read-only, stream buffer attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct Instruction;

/// Data-side role: read/write, write-back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Data;

impl CacheRole for Instruction {
    const KIND: CacheKind = CacheKind::Instruction;
}

impl CacheRole for Data {
    const KIND: CacheKind = CacheKind::Data;
}

/// Instruction cache.
pub type InstructionCache = DirectMappedCache<Instruction>;

/// Data cache.
pub type DataCache = DirectMappedCache<Data>;

/// Miss-handling state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MissState {
    /// Serving hits; detecting misses.
    #[default]
    Ready,
    /// Driving a read burst request.
    RefillRequest,
    /// Receiving refill beats.
    RefillData,
    /// Driving a write burst request for the dirty resident line.
    FlushRequest,
    /// Sending write-back beats and waiting for completion.
    FlushData,
    /// Copying a line back from the victim cache.
    VictimRestore,
    /// Copying a line back from the stream buffer.
    StreamRestore,
}

impl MissState {
    /// True outside [`MissState::Ready`].
    pub const fn is_busy(self) -> bool {
        !matches!(self, Self::Ready)
    }
}

/// A processor-side request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheRequest {
    /// Byte address.
    pub addr: u32,
    /// Word to store; `None` for a read. Ignored by read-only caches.
    pub store: Option<u32>,
}

/// Inputs of one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheInput {
    /// The request presented this cycle, if any.
    pub request: Option<CacheRequest>,
    /// Address the read port samples this cycle for use next cycle.
    pub addr_next: u32,
    /// Memory channel signals.
    pub bus: BusResponse,
}

impl CacheInput {
    /// A read of `addr`.
    pub const fn read(addr: u32, addr_next: u32, bus: BusResponse) -> Self {
        Self {
            request: Some(CacheRequest { addr, store: None }),
            addr_next,
            bus,
        }
    }

    /// A store of `value` to `addr`.
    pub const fn store(addr: u32, value: u32, addr_next: u32, bus: BusResponse) -> Self {
        Self {
            request: Some(CacheRequest {
                addr,
                store: Some(value),
            }),
            addr_next,
            bus,
        }
    }

    /// No request; the read port still samples `addr_next`.
    pub const fn idle(addr_next: u32, bus: BusResponse) -> Self {
        Self {
            request: None,
            addr_next,
            bus,
        }
    }
}

/// Outputs of one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheOutput {
    /// The request was served this cycle.
    pub valid: bool,
    /// Word read; for a store, the word before the write. Zero unless `valid`.
    pub data: u32,
    /// Signals driven to memory.
    pub bus: BusRequest,
    /// State the cache was in during this cycle.
    pub state: MissState,
}

/// Registers of the miss sequence in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct MissRegs {
    /// Line being brought in.
    line: LineAddr,
    /// Refill beats received, or write-back beats accepted.
    beat: usize,
    /// One-hot word enable of a restore.
    enable: u64,
    /// Restore source, captured when the miss was detected.
    fill: LineData,
    /// Dirty line being written back.
    evicted: LineAddr,
    /// Contents of the dirty line being written back.
    evicted_data: LineData,
}

/// Next-state values produced by [`DirectMappedCache::evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheUpdate {
    state: MissState,
    regs: MissRegs,
    write: Option<LineWrite>,
    read_index: usize,
    victim_insert: Option<(LineAddr, LineData)>,
    victim_word: Option<(usize, usize, u32)>,
    stream_insert: Option<(LineAddr, LineData)>,
    stats: CacheStats,
}

/// Direct-mapped cache parameterized by its role.
#[derive(Debug)]
pub struct DirectMappedCache<R: CacheRole> {
    geometry: LineGeometry,
    store: LineStore,
    victim: VictimCache,
    stream: Option<StreamBuffer>,
    state: MissState,
    regs: MissRegs,
    stats: CacheStats,
    role: PhantomData<R>,
}

impl<R: CacheRole> DirectMappedCache<R> {
    /// Builds an empty cache.
    ///
    /// # Errors
    ///
    /// Returns the first geometry or capacity fault found by [`CacheConfig::validate`].
    pub fn new(config: &CacheConfig, memory: &MemoryConfig) -> Result<Self, ConfigError> {
        let geometry = config.validate(R::KIND, memory)?;
        let words = geometry.line_words();
        let stream = match config.stream_entries(R::KIND) {
            0 => None,
            n => Some(StreamBuffer::new(n, words)),
        };
        tracing::debug!(
            cache = R::KIND.name(),
            depth = geometry.depth(),
            line_words = words,
            victim = config.victim_entries(R::KIND),
            stream = stream.as_ref().map_or(0, StreamBuffer::capacity),
            "cache built"
        );
        Ok(Self {
            geometry,
            store: LineStore::new(geometry.depth(), words),
            victim: VictimCache::new(config.victim_entries(R::KIND), words),
            stream,
            state: MissState::Ready,
            regs: MissRegs::default(),
            stats: CacheStats::default(),
            role: PhantomData,
        })
    }

    /// Which cache this is.
    pub const fn kind(&self) -> CacheKind {
        R::KIND
    }

    /// Address layout.
    pub const fn geometry(&self) -> &LineGeometry {
        &self.geometry
    }

    /// Current miss-handling state.
    pub const fn state(&self) -> MissState {
        self.state
    }

    /// Counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Contents of slot `index`.
    pub fn slot(&self, index: usize) -> LineRead {
        self.store.slot(index)
    }

    /// Output of last cycle's read.
    pub const fn registered(&self) -> &LineRead {
        self.store.registered()
    }

    /// Victim cache.
    pub const fn victim(&self) -> &VictimCache {
        &self.victim
    }

    /// Stream buffer, on the instruction side.
    pub const fn stream(&self) -> Option<&StreamBuffer> {
        self.stream.as_ref()
    }

    /// Whether the primary cache currently holds `addr`'s line.
    pub fn contains(&self, addr: u32) -> bool {
        let slot = self.store.slot(self.geometry.index(addr));
        slot.valid && slot.tag == self.geometry.tag(addr)
    }

    /// Clears every line, buffer and register.
    pub fn reset(&mut self) {
        self.store.reset();
        self.victim.reset();
        if let Some(stream) = &mut self.stream {
            stream.reset();
        }
        self.state = MissState::Ready;
        self.regs = MissRegs::default();
        self.stats = CacheStats::default();
    }

    /// Runs one full cycle.
    pub fn step(&mut self, input: &CacheInput) -> CacheOutput {
        let (out, next) = self.evaluate(input);
        self.commit(next);
        out
    }

    /// Computes this cycle's outputs and next state from registered state only.
    pub fn evaluate(&self, input: &CacheInput) -> (CacheOutput, CacheUpdate) {
        let geo = &self.geometry;
        let words = geo.line_words();
        let mut out = CacheOutput {
            state: self.state,
            ..CacheOutput::default()
        };
        let mut next = CacheUpdate {
            state: self.state,
            regs: self.regs,
            write: None,
            read_index: geo.index(input.addr_next),
            victim_insert: None,
            victim_word: None,
            stream_insert: None,
            stats: self.stats,
        };

        match self.state {
            MissState::Ready => {
                if let Some(req) = input.request {
                    self.lookup(req, &mut out, &mut next);
                }
            }
            MissState::RefillRequest => {
                out.bus.read = Some(BurstRequest {
                    addr: geo.base(self.regs.line),
                    len: words,
                });
                if input.bus.read_ready {
                    next.state = MissState::RefillData;
                    next.regs.beat = 0;
                }
            }
            MissState::RefillData => {
                if let Some(word) = input.bus.read_beat {
                    let last = self.regs.beat + 1 == words;
                    next.write = Some(LineWrite {
                        index: geo.line_index(self.regs.line),
                        word: Some((self.regs.beat, word)),
                        tag: if last {
                            TagWrite::Fill {
                                tag: geo.line_tag(self.regs.line),
                            }
                        } else {
                            TagWrite::Keep
                        },
                    });
                    if last {
                        next.state = MissState::Ready;
                        next.stats.refills += 1;
                    } else {
                        next.regs.beat = self.regs.beat + 1;
                    }
                }
            }
            MissState::FlushRequest => {
                out.bus.write = Some(BurstRequest {
                    addr: geo.base(self.regs.evicted),
                    len: words,
                });
                if input.bus.write_ready {
                    next.state = MissState::FlushData;
                    next.regs.beat = 0;
                }
            }
            MissState::FlushData => {
                let mut sent = self.regs.beat;
                if sent < words {
                    out.bus.write_beat = Some(self.regs.evicted_data.word(sent));
                    if input.bus.write_beat_ready {
                        sent += 1;
                    }
                }
                next.regs.beat = sent;
                if sent == words && input.bus.write_done {
                    next.state = MissState::RefillRequest;
                    next.write = Some(LineWrite {
                        index: geo.line_index(self.regs.evicted),
                        word: None,
                        tag: TagWrite::ClearDirty,
                    });
                }
            }
            MissState::VictimRestore | MissState::StreamRestore => {
                let offset = encode_bits(self.regs.enable).index;
                let last = offset + 1 == words;
                next.write = Some(LineWrite {
                    index: geo.line_index(self.regs.line),
                    word: Some((offset, self.regs.fill.word(offset))),
                    tag: if last {
                        TagWrite::Fill {
                            tag: geo.line_tag(self.regs.line),
                        }
                    } else {
                        TagWrite::Keep
                    },
                });
                next.regs.enable = rotate_enable(self.regs.enable, words);
                if last {
                    next.state = MissState::Ready;
                }
            }
        }

        (out, next)
    }

    /// Hit/miss decision for a request presented in [`MissState::Ready`].
    fn lookup(&self, req: CacheRequest, out: &mut CacheOutput, next: &mut CacheUpdate) {
        let geo = &self.geometry;
        let reg = self.store.registered();
        let index = geo.index(req.addr);

        // The read port sampled a different slot last cycle.
        if reg.index != index {
            return;
        }

        let line = geo.line(req.addr);
        if reg.valid && reg.tag == geo.tag(req.addr) {
            let offset = geo.offset(req.addr);
            out.valid = true;
            out.data = reg.data.word(offset);
            next.stats.hits += 1;

            if let (true, Some(value)) = (R::WRITABLE, req.store) {
                next.write = Some(LineWrite {
                    index,
                    word: Some((offset, value)),
                    tag: TagWrite::SetDirty,
                });
                next.stats.stores += 1;
                if let Some(slot) = self.victim.lookup(line).get() {
                    next.victim_word = Some((slot, offset, value));
                }
            }
            if self.stream.is_some() {
                next.stream_insert = Some((line, reg.data));
                next.stats.stream_inserts += 1;
            }
            return;
        }

        next.stats.misses += 1;
        next.regs.line = line;
        next.regs.beat = 0;
        if reg.valid {
            next.victim_insert = Some((geo.line_of(reg.tag, index), reg.data));
            next.stats.victim_inserts += 1;
        }

        let dirty = R::WRITABLE && reg.valid && reg.dirty;
        let victim_hit = self.victim.lookup(line).get().filter(|_| !dirty);
        let stream_hit = self
            .stream
            .as_ref()
            .and_then(|s| s.lookup(line).get().map(|slot| s.read(slot)));

        if let Some(slot) = victim_hit {
            next.regs.fill = self.victim.read(slot);
            next.regs.enable = 1;
            next.state = MissState::VictimRestore;
            next.stats.victim_restores += 1;
        } else if let Some(data) = stream_hit {
            next.regs.fill = data;
            next.regs.enable = 1;
            next.state = MissState::StreamRestore;
            next.stats.stream_restores += 1;
        } else if dirty {
            next.regs.evicted = geo.line_of(reg.tag, index);
            next.regs.evicted_data = reg.data;
            next.state = MissState::FlushRequest;
            next.stats.flushes += 1;
        } else {
            next.state = MissState::RefillRequest;
        }
    }

    /// Applies the next-state values of one cycle.
    pub fn commit(&mut self, next: CacheUpdate) {
        if next.state != self.state {
            tracing::debug!(
                cache = R::KIND.name(),
                from = ?self.state,
                to = ?next.state,
                line = %next.regs.line,
                "miss state transition"
            );
        }

        self.store.commit(next.write, next.read_index);

        if let Some((line, data)) = next.victim_insert {
            let outcome = self.victim.insert(line, data);
            tracing::trace!(cache = R::KIND.name(), %line, ?outcome, "victim insert");
        }
        if let Some((slot, offset, value)) = next.victim_word {
            self.victim.write_word(slot, offset, value);
        }
        if let (Some(stream), Some((line, data))) = (self.stream.as_mut(), next.stream_insert) {
            let _ = stream.insert(line, data);
        }

        self.state = next.state;
        self.regs = next.regs;
        self.stats = next.stats;
    }
}

/// Rotates a one-hot enable left by one within a `words`-bit field.
fn rotate_enable(enable: u64, words: usize) -> u64 {
    let width = words as u32;
    ((enable << 1) | (enable >> (width - 1))) & u64::from(low_mask(width))
}
