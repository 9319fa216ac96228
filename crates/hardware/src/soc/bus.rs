//! Burst memory channel signals.
//!
//! A cache talks to memory over two independent channels:
//! 1. **Read:** a burst request (line base address and length) followed by one
//!    data beat per cycle.
//! 2. **Write:** a burst request, one data beat per accepted cycle, then a single
//!    completion acknowledgment.
//!
//! Requests use single-cycle handshakes: a request is accepted exactly when the
//! requester drives it and the responder reports ready in the same cycle.

/// A burst request on either channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BurstRequest {
    /// Byte address of the first word of the line.
    pub addr: u32,
    /// Number of words in the burst.
    pub len: usize,
}

/// Signals a requester (cache) drives towards memory in one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusRequest {
    /// Read burst request, if one is being driven.
    pub read: Option<BurstRequest>,
    /// Write burst request, if one is being driven.
    pub write: Option<BurstRequest>,
    /// Write data beat offered this cycle.
    pub write_beat: Option<u32>,
}

impl BusRequest {
    /// True when no signal is driven.
    pub const fn is_idle(&self) -> bool {
        self.read.is_none() && self.write.is_none() && self.write_beat.is_none()
    }
}

/// Signals a responder (memory) drives towards a cache in one cycle.
///
/// Every field is a function of the responder's registered state, never of the
/// request driven in the same cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BusResponse {
    /// A read request driven this cycle is accepted.
    pub read_ready: bool,
    /// Read data beat delivered this cycle.
    pub read_beat: Option<u32>,
    /// A write request driven this cycle is accepted.
    pub write_ready: bool,
    /// A write data beat driven this cycle is accepted.
    pub write_beat_ready: bool,
    /// The write burst in progress has completed.
    pub write_done: bool,
}

impl BusResponse {
    /// Whether `request` carries a read request accepted this cycle.
    #[inline(always)]
    pub const fn read_accepted(&self, request: &BusRequest) -> bool {
        self.read_ready && request.read.is_some()
    }

    /// Whether `request` carries a write request accepted this cycle.
    #[inline(always)]
    pub const fn write_accepted(&self, request: &BusRequest) -> bool {
        self.write_ready && request.write.is_some()
    }

    /// Whether `request` carries a write beat accepted this cycle.
    #[inline(always)]
    pub const fn beat_accepted(&self, request: &BusRequest) -> bool {
        self.write_beat_ready && request.write_beat.is_some()
    }
}
