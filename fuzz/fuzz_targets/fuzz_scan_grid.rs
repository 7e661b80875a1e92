//! Fuzz target for the scan loop on arbitrary small grids.
//!
//! The best-only result must equal the first maximum of the exhaustive table.

#![no_main]

use arbitrary::Arbitrary;
use ebscan_common::{Grid, ScoreKind, ZoneSet};
use ebscan_core::scan::{EbNegBinModel, Retention, ScanEngine};
use libfuzzer_sys::fuzz_target;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Arbitrary)]
struct GridCase {
    times: u8,
    locs: u8,
    counts: Vec<u16>,
    baselines: Vec<u16>,
    omegas: Vec<u16>,
    zones: Vec<Vec<u8>>,
    max_dur: u8,
    emerging: bool,
    seed: u64,
}

fuzz_target!(|case: GridCase| {
    let times = usize::from(case.times % 6) + 1;
    let locs = usize::from(case.locs % 6) + 1;
    let n = times * locs;
    if case.counts.len() < n || case.baselines.len() < n || case.omegas.len() < n {
        return;
    }
    let zones: Vec<Vec<usize>> = case
        .zones
        .iter()
        .take(8)
        .filter(|z| !z.is_empty())
        .map(|z| z.iter().map(|&id| usize::from(id) % locs).collect())
        .collect();
    if zones.is_empty() {
        return;
    }
    let max_dur = usize::from(case.max_dur) % times + 1;
    let kind = if case.emerging {
        ScoreKind::Emerging
    } else {
        ScoreKind::Hotspot
    };

    let counts = Grid::from_fn(times, locs, |t, l| u64::from(case.counts[t * locs + l]));
    let baselines = Grid::from_fn(times, locs, |t, l| f64::from(case.baselines[t * locs + l]) / 16.0 + 0.01);
    let omegas = Grid::from_fn(times, locs, |t, l| match case.omegas[t * locs + l] {
        0 => f64::INFINITY,
        w => f64::from(w) / 64.0,
    });
    let engine = |retention| {
        let model = EbNegBinModel::new(baselines.clone(), omegas.clone(), kind);
        ScanEngine::new(counts.clone(), model, ZoneSet::from_nested(&zones), max_dur, retention, 3)
    };

    let mut all = engine(Retention::All);
    all.run_scan();
    let table = all.observed_table();
    assert_eq!(table.len(), zones.len() * max_dur);

    let mut best = engine(Retention::Best);
    best.run_scan();
    best.run_mcsim(&mut StdRng::seed_from_u64(case.seed));
    let best_row = best.observed_table().rows[0];
    let first_max = table.iter().find(|r| r.score == best_row.score).copied();
    assert_eq!(first_max, Some(best_row));
    assert_eq!(best.simulated_table().len(), 3);
});
