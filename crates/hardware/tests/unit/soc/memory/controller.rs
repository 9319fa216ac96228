//! Memory Controller Unit Tests.
//!
//! Verifies `SimpleController` (fixed latency), `DramController` (row-buffer-aware
//! latency with CAS/RAS/precharge) and selection from configuration.

use rstest::rstest;
use uarch_core::config::{MemoryConfig, MemoryControllerKind};
use uarch_core::soc::memory::controller::{
    DramController, MemoryController, SimpleController, from_config,
};

// ══════════════════════════════════════════════════════════
// 1. SimpleController
// ══════════════════════════════════════════════════════════

#[test]
fn simple_controller_address_independent() {
    let mut ctrl = SimpleController::new(5);
    assert_eq!(ctrl.access_latency(0), 5);
    assert_eq!(ctrl.access_latency(0x1000), 5);
    assert_eq!(ctrl.access_latency(u32::MAX), 5);
}

// ══════════════════════════════════════════════════════════
// 2. DramController
// ══════════════════════════════════════════════════════════

#[test]
fn dram_cold_start_latency() {
    let mut ctrl = DramController::new(5, 10, 8);
    // No row open: t_ras + t_cas
    assert_eq!(ctrl.access_latency(0x1000), 15);
}

#[test]
fn dram_row_buffer_hit() {
    let mut ctrl = DramController::new(5, 10, 8);
    let _ = ctrl.access_latency(0x2000);
    assert_eq!(ctrl.access_latency(0x2100), 5);
    assert_eq!(ctrl.access_latency(0x27FC), 5);
}

#[test]
fn dram_row_switch_back() {
    let mut ctrl = DramController::new(5, 10, 8);
    let _ = ctrl.access_latency(0x1000); // cold: 15
    let _ = ctrl.access_latency(0x1004); // hit: 5
    assert_eq!(ctrl.access_latency(0x2800), 23);
    let _ = ctrl.access_latency(0x2804);
    assert_eq!(ctrl.access_latency(0x1000), 23);
}

/// Rows are 2 KiB.
#[test]
fn dram_row_boundary_exact() {
    let mut ctrl = DramController::new(5, 10, 8);
    let _ = ctrl.access_latency(0x07FC);
    assert_eq!(
        ctrl.access_latency(0x0800),
        23,
        "0x0800 should be a different row"
    );
}

#[rstest]
#[case(1, 2, 1, [3, 1, 4])]
#[case(20, 40, 30, [60, 20, 90])]
fn dram_timing_parameters(
    #[case] t_cas: u32,
    #[case] t_ras: u32,
    #[case] t_pre: u32,
    #[case] expected: [u32; 3],
) {
    let mut ctrl = DramController::new(t_cas, t_ras, t_pre);
    let got = [
        ctrl.access_latency(0),
        ctrl.access_latency(0),
        ctrl.access_latency(0x1000),
    ];
    assert_eq!(got, expected);
}

// ══════════════════════════════════════════════════════════
// 3. Selection
// ══════════════════════════════════════════════════════════

#[test]
fn config_selects_controller() {
    let simple = MemoryConfig {
        read_latency: 7,
        ..MemoryConfig::default()
    };
    assert_eq!(from_config(&simple).access_latency(0), 7);

    let dram = MemoryConfig {
        controller: MemoryControllerKind::Dram,
        t_cas: 2,
        t_ras: 3,
        t_pre: 4,
        ..MemoryConfig::default()
    };
    let mut ctrl = from_config(&dram);
    assert_eq!(ctrl.access_latency(0), 5);
    assert_eq!(ctrl.access_latency(4), 2);
}
