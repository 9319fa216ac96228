//! Burst Channel Unit Tests.
//!
//! Drives a burst memory port by hand and checks the handshake timing of the
//! read and write channels, beat contents, and per-port isolation.

use pretty_assertions::assert_eq;
use rstest::rstest;
use uarch_core::config::MemoryConfig;
use uarch_core::soc::memory::BurstMemory;
use uarch_core::soc::{BurstRequest, BusRequest};

fn memory(read_latency: u32, write_latency: u32) -> BurstMemory {
    let config = MemoryConfig {
        read_latency,
        write_latency,
        ..MemoryConfig::default()
    };
    BurstMemory::new(&config, 2)
}

fn read(addr: u32, len: usize) -> BusRequest {
    BusRequest {
        read: Some(BurstRequest { addr, len }),
        ..BusRequest::default()
    }
}

fn write(addr: u32, len: usize) -> BusRequest {
    BusRequest {
        write: Some(BurstRequest { addr, len }),
        ..BusRequest::default()
    }
}

fn beat(word: u32) -> BusRequest {
    BusRequest {
        write_beat: Some(word),
        ..BusRequest::default()
    }
}

/// Clocks `port` idle until a read beat appears; returns the cycles waited.
fn cycles_to_first_beat(mem: &mut BurstMemory, port: usize) -> u32 {
    for n in 1..100 {
        if mem.response(port).read_beat.is_some() {
            return n;
        }
        mem.clock(port, &BusRequest::default());
    }
    panic!("no read beat");
}

// ══════════════════════════════════════════════════════════
// 1. Read channel
// ══════════════════════════════════════════════════════════

#[test]
fn read_burst_streams_consecutive_words() {
    let mut mem = memory(1, 1);
    mem.load(0x40, &[1, 2, 3, 4]);

    assert!(mem.response(0).read_ready);
    mem.clock(0, &read(0x40, 4));
    assert!(!mem.response(0).read_ready);

    let mut beats = Vec::new();
    while let Some(word) = mem.response(0).read_beat {
        beats.push(word);
        mem.clock(0, &BusRequest::default());
    }
    assert_eq!(beats, vec![1, 2, 3, 4]);
    assert!(mem.response(0).read_ready);

    let stats = mem.port_stats(0);
    assert_eq!(stats.read_bursts, 1);
    assert_eq!(stats.read_beats, 4);
}

/// The first beat arrives `latency` cycles after the request is accepted.
#[rstest]
#[case(0, 1)]
#[case(1, 1)]
#[case(2, 2)]
#[case(5, 5)]
fn read_latency_delays_first_beat(#[case] latency: u32, #[case] expected: u32) {
    let mut mem = memory(latency, 1);
    mem.clock(0, &read(0, 2));
    assert_eq!(cycles_to_first_beat(&mut mem, 0), expected);
}

#[test]
fn request_without_ready_is_ignored() {
    let mut mem = memory(1, 1);
    mem.clock(0, &read(0, 2));
    // Busy: a second request is not accepted.
    mem.clock(0, &read(0x100, 2));
    mem.clock(0, &BusRequest::default());
    assert!(mem.response(0).read_ready);
    assert_eq!(mem.port_stats(0).read_bursts, 1);
}

// ══════════════════════════════════════════════════════════
// 2. Write channel
// ══════════════════════════════════════════════════════════

#[test]
fn write_burst_commits_beats_then_acknowledges() {
    let mut mem = memory(1, 1);

    assert!(mem.response(0).write_ready);
    mem.clock(0, &write(0x80, 2));

    let r = mem.response(0);
    assert!(!r.write_ready);
    assert!(r.write_beat_ready);
    mem.clock(0, &beat(0xAA));
    assert_eq!(mem.read_word(0x80), 0xAA);
    mem.clock(0, &beat(0xBB));
    assert_eq!(mem.read_word(0x84), 0xBB);

    let r = mem.response(0);
    assert!(r.write_done);
    assert!(!r.write_beat_ready);
    mem.clock(0, &BusRequest::default());
    assert!(mem.response(0).write_ready);

    let stats = mem.port_stats(0);
    assert_eq!(stats.write_bursts, 1);
    assert_eq!(stats.write_beats, 2);
}

/// The channel waits as long as the writer withholds a beat.
#[test]
fn missing_beat_stalls_write() {
    let mut mem = memory(1, 1);
    mem.clock(0, &write(0, 2));
    for _ in 0..3 {
        mem.clock(0, &BusRequest::default());
        assert!(mem.response(0).write_beat_ready);
    }
    mem.clock(0, &beat(1));
    mem.clock(0, &beat(2));
    assert!(mem.response(0).write_done);
}

#[test]
fn write_latency_delays_acknowledge() {
    let mut mem = memory(1, 3);
    mem.clock(0, &write(0, 2));
    mem.clock(0, &beat(1));
    mem.clock(0, &beat(2));
    let mut waited = 0;
    while !mem.response(0).write_done {
        mem.clock(0, &BusRequest::default());
        waited += 1;
    }
    assert_eq!(waited, 2);
}

// ══════════════════════════════════════════════════════════
// 3. Ports
// ══════════════════════════════════════════════════════════

#[test]
fn ports_are_independent() {
    let mut mem = memory(1, 1);
    mem.load(0, &[7, 8]);
    mem.clock(0, &read(0, 2));
    mem.clock(1, &write(0x100, 2));

    assert_eq!(mem.response(0).read_beat, Some(7));
    assert!(mem.response(1).read_ready);
    assert!(mem.response(1).write_beat_ready);
    assert!(mem.response(0).write_ready);
    assert_eq!(mem.port_count(), 2);
}

/// Both ports share one backing store.
#[test]
fn written_data_visible_on_other_port() {
    let mut mem = memory(1, 1);
    mem.clock(1, &write(0x20, 2));
    mem.clock(1, &beat(0x11));
    mem.clock(1, &beat(0x22));

    mem.clock(0, &read(0x20, 2));
    assert_eq!(mem.response(0).read_beat, Some(0x11));
}
