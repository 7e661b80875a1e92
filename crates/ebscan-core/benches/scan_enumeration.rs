//! Criterion benchmarks for the scan loop in `ebscan-core`.
//!
//! One observed pass over every (zone, duration) window, and a short batch of
//! Monte Carlo replicates, on synthetic grids of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ebscan_common::{Grid, ScoreKind, ZoneSet};
use ebscan_core::scan::{EbNegBinModel, Retention, ScanEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// `locs` locations on a line; zone `i` is location `i` and its `k - 1`
/// right-hand neighbours.
fn engine(times: usize, locs: usize, k: usize, retention: Retention) -> ScanEngine<EbNegBinModel> {
    let counts = Grid::from_fn(times, locs, |t, l| ((t * 7 + l * 3) % 11) as u64);
    let baselines = Grid::from_fn(times, locs, |_, l| 3.0 + (l % 4) as f64);
    let overdispersion = Grid::filled(times, locs, 2.0);
    let zones = ZoneSet::from_nested((0..locs).map(|i| (i..(i + k).min(locs)).collect::<Vec<_>>()));
    let model = EbNegBinModel::new(baselines, overdispersion, ScoreKind::Hotspot);
    ScanEngine::new(counts, model, zones, times, retention, 10)
}

fn bench_observed_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan/observed");

    for (name, times, locs, k) in [("small", 4, 20, 3), ("medium", 8, 100, 5), ("large", 14, 400, 8)] {
        for (label, retention) in [("best", Retention::Best), ("all", Retention::All)] {
            let mut e = engine(times, locs, k, retention);
            group.bench_function(BenchmarkId::new(label, name), |b| {
                b.iter(|| {
                    e.run_scan();
                    black_box(e.observed_table().len());
                })
            });
        }
    }

    group.finish();
}

fn bench_replicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan/mcsim10");
    group.sample_size(20);

    for (name, times, locs, k) in [("small", 4, 20, 3), ("medium", 8, 100, 5)] {
        let mut e = engine(times, locs, k, Retention::Best);
        let mut rng = StdRng::seed_from_u64(42);
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| {
                e.run_mcsim(&mut rng);
                black_box(e.simulated_table().len());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_observed_pass, bench_replicates);
criterion_main!(benches);
