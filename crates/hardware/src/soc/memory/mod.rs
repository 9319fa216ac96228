//! Burst-transfer main memory.
//!
//! This module implements the memory the caches refill from and write back to. It provides:
//! 1. **Buffer:** Sparse backing storage for memory contents.
//! 2. **Controller:** Latency modeling (simple or DRAM row-buffer) for read bursts.
//! 3. **Ports:** Independent read/write burst channels sharing one backing store, one
//!    port per cache.
//!
//! Each cycle a port first exposes its [`BusResponse`] (a pure function of its
//! registered state), the attached cache reacts, and then [`BurstMemory::clock`]
//! commits the cycle given what the cache drove.

/// Sparse word storage.
pub mod buffer;

/// Memory controller implementations for access latency modeling.
pub mod controller;

use serde::Serialize;

use self::buffer::WordBuffer;
use self::controller::MemoryController;
use crate::common::constants::WORD_BYTES;
use crate::config::MemoryConfig;
use crate::soc::bus::{BusRequest, BusResponse};

/// Read channel state of one port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReadState {
    Idle,
    /// Waiting `remaining` more cycles before the first beat.
    Latency { addr: u32, len: usize, remaining: u32 },
    /// Delivering beat `beat` this cycle.
    Streaming { addr: u32, len: usize, beat: usize },
}

/// Write channel state of one port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WriteState {
    Idle,
    /// Accepting beat `beat` of the burst.
    Receiving { addr: u32, len: usize, beat: usize },
    /// Acknowledging completion once `remaining` reaches zero.
    Acknowledge { remaining: u32 },
}

/// Per-port transfer counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PortStats {
    /// Read bursts accepted.
    pub read_bursts: u64,
    /// Read beats delivered.
    pub read_beats: u64,
    /// Write bursts accepted.
    pub write_bursts: u64,
    /// Write beats accepted.
    pub write_beats: u64,
}

#[derive(Clone, Copy, Debug)]
struct Port {
    read: ReadState,
    write: WriteState,
    stats: PortStats,
}

impl Port {
    const fn new() -> Self {
        Self {
            read: ReadState::Idle,
            write: WriteState::Idle,
            stats: PortStats {
                read_bursts: 0,
                read_beats: 0,
                write_bursts: 0,
                write_beats: 0,
            },
        }
    }
}

/// Main memory with one burst port per attached cache.
#[derive(Debug)]
pub struct BurstMemory {
    buffer: WordBuffer,
    controller: Box<dyn MemoryController>,
    write_latency: u32,
    max_burst: usize,
    ports: Vec<Port>,
}

impl BurstMemory {
    /// Creates a zero-filled memory with `ports` independent burst ports.
    pub fn new(config: &MemoryConfig, ports: usize) -> Self {
        Self::with_controller(config, ports, controller::from_config(config))
    }

    /// Creates a zero-filled memory whose read latency comes from `controller`.
    pub fn with_controller(
        config: &MemoryConfig,
        ports: usize,
        controller: Box<dyn MemoryController>,
    ) -> Self {
        Self {
            buffer: WordBuffer::new(),
            controller,
            write_latency: config.write_latency,
            max_burst: config.max_burst,
            ports: vec![Port::new(); ports],
        }
    }

    /// Number of ports.
    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    /// Backing store contents.
    pub const fn buffer(&self) -> &WordBuffer {
        &self.buffer
    }

    /// Reads one word directly, bypassing the ports.
    pub fn read_word(&self, addr: u32) -> u32 {
        self.buffer.read(addr)
    }

    /// Writes one word directly, bypassing the ports.
    pub fn write_word(&mut self, addr: u32, value: u32) {
        self.buffer.write(addr, value);
    }

    /// Loads consecutive words starting at `base`, bypassing the ports.
    pub fn load(&mut self, base: u32, words: &[u32]) {
        self.buffer.load(base, words);
    }

    /// Transfer counters of `port`.
    pub fn port_stats(&self, port: usize) -> PortStats {
        self.ports[port].stats
    }

    /// Signals `port` drives this cycle.
    pub fn response(&self, port: usize) -> BusResponse {
        let p = &self.ports[port];
        BusResponse {
            read_ready: matches!(p.read, ReadState::Idle),
            read_beat: match p.read {
                ReadState::Streaming { addr, beat, .. } => {
                    Some(self.buffer.read(addr.wrapping_add(beat as u32 * WORD_BYTES)))
                }
                _ => None,
            },
            write_ready: matches!(p.write, WriteState::Idle),
            write_beat_ready: matches!(p.write, WriteState::Receiving { .. }),
            write_done: matches!(p.write, WriteState::Acknowledge { remaining: 0 }),
        }
    }

    /// Commits one cycle of `port` given the signals its cache drove.
    pub fn clock(&mut self, port: usize, request: &BusRequest) {
        let response = self.response(port);
        let p = self.ports[port];
        let mut stats = p.stats;

        let read = match p.read {
            ReadState::Idle => match request.read {
                Some(req) if response.read_ready => {
                    debug_assert!(req.len <= self.max_burst, "burst longer than max_burst");
                    stats.read_bursts += 1;
                    let latency = self.controller.access_latency(req.addr);
                    tracing::trace!(port, addr = req.addr, len = req.len, latency, "read burst accepted");
                    if latency <= 1 {
                        ReadState::Streaming {
                            addr: req.addr,
                            len: req.len,
                            beat: 0,
                        }
                    } else {
                        ReadState::Latency {
                            addr: req.addr,
                            len: req.len,
                            remaining: latency - 1,
                        }
                    }
                }
                _ => ReadState::Idle,
            },
            ReadState::Latency {
                addr,
                len,
                remaining,
            } => {
                if remaining <= 1 {
                    ReadState::Streaming { addr, len, beat: 0 }
                } else {
                    ReadState::Latency {
                        addr,
                        len,
                        remaining: remaining - 1,
                    }
                }
            }
            ReadState::Streaming { addr, len, beat } => {
                stats.read_beats += 1;
                if beat + 1 >= len {
                    ReadState::Idle
                } else {
                    ReadState::Streaming {
                        addr,
                        len,
                        beat: beat + 1,
                    }
                }
            }
        };

        let mut committed_word = None;
        let write = match p.write {
            WriteState::Idle => match request.write {
                Some(req) if response.write_ready => {
                    debug_assert!(req.len <= self.max_burst, "burst longer than max_burst");
                    stats.write_bursts += 1;
                    tracing::trace!(port, addr = req.addr, len = req.len, "write burst accepted");
                    WriteState::Receiving {
                        addr: req.addr,
                        len: req.len,
                        beat: 0,
                    }
                }
                _ => WriteState::Idle,
            },
            WriteState::Receiving { addr, len, beat } => match request.write_beat {
                Some(word) => {
                    stats.write_beats += 1;
                    committed_word = Some((addr.wrapping_add(beat as u32 * WORD_BYTES), word));
                    if beat + 1 >= len {
                        WriteState::Acknowledge {
                            remaining: self.write_latency.saturating_sub(1),
                        }
                    } else {
                        WriteState::Receiving {
                            addr,
                            len,
                            beat: beat + 1,
                        }
                    }
                }
                None => p.write,
            },
            WriteState::Acknowledge { remaining: 0 } => WriteState::Idle,
            WriteState::Acknowledge { remaining } => WriteState::Acknowledge {
                remaining: remaining - 1,
            },
        };

        if let Some((addr, word)) = committed_word {
            self.buffer.write(addr, word);
        }
        self.ports[port] = Port { read, write, stats };
    }
}
