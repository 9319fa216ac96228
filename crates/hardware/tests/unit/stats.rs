//! Statistics Unit Tests.
//!
//! Derived rates and the JSON shape of the report.

use pretty_assertions::assert_eq;
use uarch_core::stats::{BranchStats, CacheStats, SimStats};

#[test]
fn rates_are_zero_before_any_access() {
    assert_eq!(CacheStats::default().hit_rate(), 0.0);
    assert_eq!(BranchStats::default().accuracy(), 0.0);
}

#[test]
fn hit_rate_counts_requests_served_without_a_miss() {
    let stats = CacheStats {
        hits: 8,
        misses: 2,
        ..CacheStats::default()
    };
    assert_eq!(stats.accesses(), 8);
    assert_eq!(stats.hit_rate(), 75.0);
}

#[test]
fn accuracy_over_resolved_branches() {
    let stats = BranchStats {
        lookups: 10,
        feedbacks: 4,
        mispredictions: 1,
        ..BranchStats::default()
    };
    assert_eq!(stats.accuracy(), 75.0);
}

#[test]
fn report_serializes_every_section() {
    let stats = SimStats {
        cycles: 12,
        icache: CacheStats {
            hits: 3,
            ..CacheStats::default()
        },
        ..SimStats::default()
    };
    let value = serde_json::to_value(stats).unwrap();
    assert_eq!(value["cycles"], 12);
    assert_eq!(value["icache"]["hits"], 3);
    for key in ["dcache", "imem", "dmem", "branch"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
}
