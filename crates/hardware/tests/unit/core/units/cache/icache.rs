//! Instruction Cache Unit Tests.
//!
//! Drives an instruction cache cycle by cycle against a burst memory and checks
//! the miss state sequence, refill contents, victim restores and stream restores.
//!
//! Unless stated otherwise the geometry is 4 slots of 2-word lines, so lines
//! are 8 bytes and addresses 32 bytes apart conflict on the same slot.

use pretty_assertions::assert_eq;
use uarch_core::common::LineAddr;
use uarch_core::core::units::cache::{
    CacheInput, CacheRequest, Instruction, InstructionCache, MissState,
};
use uarch_core::config::{CacheConfig, MemoryConfig};
use uarch_core::soc::BusResponse;

use crate::common::harness::{CacheHarness, cache_config};

/// Slot stride of the small geometry.
const STRIDE: u32 = 32;

fn small(victim: usize, stream: usize) -> CacheHarness<Instruction> {
    CacheHarness::new(&cache_config(2, 1, victim, Some(stream)))
}

// ══════════════════════════════════════════════════════════
// 1. Cold refill
// ══════════════════════════════════════════════════════════

/// After reset, a request for 0x0 refills the line over exactly LineSize beats
/// and then hits with the first beat.
#[test]
fn cold_miss_refills_then_hits() {
    let mut h: CacheHarness<Instruction> = CacheHarness::new(&CacheConfig::default());
    let words = [0x1111_0000, 0x2222_0000, 0x3333_0000, 0x4444_0000];
    h.fill(0, &words);

    let (data, cycles) = h.access(0, None);

    assert_eq!(data, words[0]);
    assert_eq!(
        h.states,
        vec![
            MissState::Ready,
            MissState::RefillRequest,
            MissState::RefillData,
            MissState::RefillData,
            MissState::RefillData,
            MissState::RefillData,
            MissState::Ready,
        ]
    );
    assert_eq!(cycles, 7);
    let slot = h.cache.slot(0);
    assert!(slot.valid);
    assert_eq!(slot.tag, 0);
    assert_eq!(slot.data.as_slice(), &words);
    assert_eq!(h.cache.stats().refills, 1);
    assert_eq!(h.burst_count(), 1);
}

/// The read request is driven with the line base and the line length.
#[test]
fn refill_request_carries_line_base() {
    let mut h = small(2, 2);
    let addr = 0x0000_1234;
    let _ = h.cycle(None, addr);
    let out = h.cycle(Some(CacheRequest { addr, store: None }), addr);
    // The read port sampled `addr`'s slot last cycle, so the miss is detected now.
    assert_eq!(out.state, MissState::Ready);
    let out = h.idle();
    assert_eq!(out.state, MissState::RefillRequest);
    let req = out.bus.read.unwrap();
    assert_eq!(req.addr, 0x0000_1230);
    assert_eq!(req.len, 2);
}

/// With a slower memory the request is accepted at once and the beats arrive later.
#[test]
fn read_latency_delays_beats() {
    let mut h: CacheHarness<Instruction> =
        CacheHarness::with_latency(&cache_config(2, 1, 2, Some(2)), 4);
    let (_, fast) = small(2, 2).access(0, None);
    let (_, slow) = h.access(0, None);
    assert_eq!(slow, fast + 3);
}

/// Words of every offset are served after one refill.
#[test]
fn every_word_of_the_line_hits() {
    let mut h: CacheHarness<Instruction> = CacheHarness::new(&CacheConfig::default());
    h.fill(0x100, &[10, 11, 12, 13]);
    assert_eq!(h.read(0x100), 10);
    for (i, expected) in [10, 11, 12, 13].into_iter().enumerate() {
        let (data, cycles) = h.access(0x100 + 4 * i as u32, None);
        assert_eq!(data, expected);
        assert_eq!(cycles, 1);
    }
    assert_eq!(h.cache.stats().misses, 1);
    assert_eq!(h.cache.stats().hits, 5);
}

// ══════════════════════════════════════════════════════════
// 2. Registered read port
// ══════════════════════════════════════════════════════════

/// A request that does not match last cycle's next address waits one cycle
/// instead of reporting a hit or a miss.
#[test]
fn unexpected_address_costs_one_cycle() {
    let mut h = small(2, 2);
    h.fill(0x08, &[7, 8]);
    let _ = h.read(0x08);

    // Read port sampled slot 1; present slot 2's address.
    let out = h.cycle(Some(CacheRequest { addr: 0x10, store: None }), 0x10);
    assert!(!out.valid);
    assert_eq!(h.cache.state(), MissState::Ready);
    assert_eq!(h.cache.stats().misses, 1);

    let out = h.cycle(Some(CacheRequest { addr: 0x10, store: None }), 0x10);
    assert!(!out.valid);
    assert_eq!(h.cache.state(), MissState::RefillRequest);
}

/// Hits are never reported while a miss is in progress.
#[test]
fn no_hits_outside_ready() {
    let mut h = small(2, 2);
    let request = Some(CacheRequest { addr: 0x08, store: None });
    let mut served = false;
    for _ in 0..10 {
        let out = h.cycle(request, 0x08);
        if out.state.is_busy() {
            assert!(!out.valid);
        }
        served |= out.valid;
    }
    assert!(served);
}

// ══════════════════════════════════════════════════════════
// 3. Victim restore
// ══════════════════════════════════════════════════════════

/// Evicting a line and re-requesting it restores it from the victim cache in
/// LineSize cycles without a memory burst.
#[test]
fn evicted_line_returns_through_victim_cache() {
    let mut h = small(4, 2);
    h.fill(0x00, &[0xA0, 0xA1]);
    h.fill(STRIDE, &[0xB0, 0xB1]);

    assert_eq!(h.read(0x00), 0xA0);
    assert_eq!(h.read(STRIDE), 0xB0);
    let bursts = h.burst_count();
    assert!(h.cache.victim().lookup(LineAddr(0)).valid);

    let mark = h.mark();
    let (data, cycles) = h.access(0x04, None);

    assert_eq!(data, 0xA1);
    assert_eq!(h.burst_count(), bursts);
    assert_eq!(
        h.states_since(mark),
        &[
            MissState::Ready,
            MissState::VictimRestore,
            MissState::VictimRestore,
            MissState::Ready
        ]
    );
    assert_eq!(cycles, 4);
    assert_eq!(h.cache.stats().victim_restores, 1);
}

/// The line displaced by a restore goes into the victim cache in the same cycle.
#[test]
fn restore_pushes_displaced_line() {
    let mut h = small(4, 2);
    let _ = h.read(0x00);
    let _ = h.read(STRIDE);
    let _ = h.read(0x00);
    let geometry = *h.cache.geometry();
    assert!(h.cache.victim().lookup(geometry.line(STRIDE)).valid);
    assert!(h.cache.victim().lookup(geometry.line(0)).valid);
    assert_eq!(h.cache.stats().victim_inserts, 2);
}

/// A re-inserted line refreshes its victim slot instead of taking a new one.
#[test]
fn ping_pong_does_not_grow_victim_cache() {
    let mut h = small(4, 2);
    for _ in 0..5 {
        let _ = h.read(0x00);
        let _ = h.read(STRIDE);
    }
    let valid = h.cache.victim().entries().iter().filter(|e| e.valid).count();
    assert_eq!(valid, 2);
    assert_eq!(h.cache.victim().pointer(), 2);
    assert_eq!(h.burst_count(), 2);
}

// ══════════════════════════════════════════════════════════
// 4. Stream restore
// ══════════════════════════════════════════════════════════

/// Every hit writes its line into the stream buffer.
#[test]
fn hits_populate_stream_buffer() {
    let mut h = small(2, 4);
    let _ = h.read(0x00);
    let _ = h.read(0x08);
    let stream = h.cache.stream().unwrap();
    assert!(stream.lookup(LineAddr(0)).valid);
    assert!(stream.lookup(LineAddr(1)).valid);
    assert_eq!(h.cache.stats().stream_inserts, 2);
}

/// Misses and refills alone never touch the stream buffer.
#[test]
fn misses_do_not_populate_stream_buffer() {
    let mut h = small(2, 4);
    let _ = h.cycle(Some(CacheRequest { addr: 0, store: None }), 0);
    for _ in 0..3 {
        let _ = h.idle();
    }
    assert!(h.cache.slot(0).valid);
    let stream = h.cache.stream().unwrap();
    assert!(stream.entries().iter().all(|e| !e.valid));
}

/// A line pushed out of a one-entry victim cache is still served from the
/// stream buffer.
#[test]
fn stream_buffer_serves_line_lost_from_victim_cache() {
    let mut h = small(1, 4);
    h.fill(0x00, &[0xA0, 0xA1]);
    let _ = h.read(0x00);
    let _ = h.read(STRIDE);
    let _ = h.read(2 * STRIDE);
    assert!(!h.cache.victim().lookup(LineAddr(0)).valid);
    let bursts = h.burst_count();

    let mark = h.mark();
    assert_eq!(h.read(0x00), 0xA0);

    assert!(h.visited_since(mark, MissState::StreamRestore));
    assert!(!h.visited_since(mark, MissState::RefillRequest));
    assert_eq!(h.burst_count(), bursts);
    assert_eq!(h.cache.stats().stream_restores, 1);
}

/// The victim cache wins when both secondary structures hold the line.
#[test]
fn victim_cache_has_priority_over_stream_buffer() {
    let mut h = small(4, 4);
    let _ = h.read(0x00);
    let _ = h.read(STRIDE);
    assert!(h.cache.stream().unwrap().lookup(LineAddr(0)).valid);

    let mark = h.mark();
    let _ = h.read(0x00);
    assert!(h.visited_since(mark, MissState::VictimRestore));
    assert!(!h.visited_since(mark, MissState::StreamRestore));
}

// ══════════════════════════════════════════════════════════
// 5. Two-phase evaluation
// ══════════════════════════════════════════════════════════

/// `evaluate` only reads state; committing its update is the same as `step`.
#[test]
fn evaluate_then_commit_matches_step() {
    let config = cache_config(2, 1, 2, Some(2));
    let memory = MemoryConfig::default();
    let mut a = InstructionCache::new(&config, &memory).unwrap();
    let mut b = InstructionCache::new(&config, &memory).unwrap();
    let input = CacheInput::read(0, 0, BusResponse::default());

    let (out_a, update) = a.evaluate(&input);
    assert_eq!(a.state(), MissState::Ready);
    a.commit(update);
    let out_b = b.step(&input);

    assert_eq!(out_a, out_b);
    assert_eq!(a.state(), b.state());
    assert_eq!(a.state(), MissState::RefillRequest);
}

#[test]
fn reset_clears_lines_and_buffers() {
    let mut h = small(2, 2);
    let _ = h.read(0x00);
    let _ = h.read(STRIDE);
    h.cache.reset();
    assert!(!h.cache.slot(0).valid);
    assert!(h.cache.victim().entries().iter().all(|e| !e.valid));
    assert!(h.cache.stream().unwrap().entries().iter().all(|e| !e.valid));
    assert_eq!(h.cache.stats().hits, 0);
}
