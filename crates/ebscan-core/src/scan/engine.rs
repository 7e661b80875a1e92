//! Zone × duration enumeration over observed and simulated counts.

use ebscan_common::{Grid, ScanTable, ZoneSet};
use rand::Rng;
use tracing::{debug, trace};

use super::model::{ScanModel, Window};
use super::storage::{Candidate, ResultColumns, Retention, StorePolicy};

/// Score every (zone, duration) window of `counts`.
///
/// Zones are visited in input order and durations from 1 to `max_dur`;
/// `sink` receives `(zone ordinal, duration index, score)` with both indices
/// 0-based.
pub fn scan_windows<M, F>(
    counts: &Grid<u64>,
    model: &M,
    zones: &ZoneSet,
    max_dur: usize,
    mut sink: F,
) where
    M: ScanModel + ?Sized,
    F: FnMut(usize, usize, f64),
{
    for (z, zone) in zones.iter().enumerate() {
        for d in 0..max_dur {
            let score = model.score(counts, &Window::new(zone, d + 1));
            sink(z, d, score);
        }
    }
}

/// Space-time scan over a fixed count grid and zone set.
///
/// The observed pass and the Monte Carlo pass write to separate result
/// columns and may run in either order.
#[derive(Debug, Clone)]
pub struct ScanEngine<M> {
    counts: Grid<u64>,
    model: M,
    zones: ZoneSet,
    max_dur: usize,
    retention: Retention,
    num_mcsim: usize,
    observed: ResultColumns,
    simulated: ResultColumns,
}

impl<M: ScanModel> ScanEngine<M> {
    /// Inputs are taken as given: `max_dur` must not exceed the number of
    /// count rows and every zone id must be a valid column.
    pub fn new(
        counts: Grid<u64>,
        model: M,
        zones: ZoneSet,
        max_dur: usize,
        retention: Retention,
        num_mcsim: usize,
    ) -> Self {
        let observed = ResultColumns::with_len(retention.slots(zones.len(), max_dur));
        Self {
            counts,
            model,
            zones,
            max_dur,
            retention,
            num_mcsim,
            observed,
            simulated: ResultColumns::with_len(num_mcsim),
        }
    }

    pub fn num_times(&self) -> usize {
        self.counts.rows()
    }

    pub fn num_locs(&self) -> usize {
        self.counts.cols()
    }

    pub fn num_zones(&self) -> usize {
        self.zones.len()
    }

    pub fn max_duration(&self) -> usize {
        self.max_dur
    }

    pub fn num_mcsim(&self) -> usize {
        self.num_mcsim
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }

    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Score every window of the observed counts.
    pub fn run_scan(&mut self) {
        let policy = self.retention.policy();
        let max_dur = self.max_dur;
        self.observed.reset_all();

        debug!(
            zones = self.zones.len(),
            max_dur,
            windows = self.zones.len() * max_dur,
            "scanning observed counts"
        );

        let observed = &mut self.observed;
        scan_windows(&self.counts, &self.model, &self.zones, max_dur, |zone, duration, score| {
            let candidate = Candidate { zone, duration, score };
            policy.store(observed, max_dur, candidate)
        });
    }

    /// Run `num_mcsim` replicates on synthetic counts drawn from the null.
    pub fn run_mcsim<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (rows, cols) = self.counts.shape();
        let max_dur = self.max_dur;
        let mut synthetic = Grid::filled(rows, cols, 0u64);

        debug!(replicates = self.num_mcsim, rows, cols, "simulating null replicates");

        for replicate in 0..self.num_mcsim {
            for r in 0..rows {
                for c in 0..cols {
                    synthetic[(r, c)] = self.model.draw_sample(r, c, rng);
                }
            }

            self.simulated.reset(replicate);
            let policy = StorePolicy::SimBest { replicate };
            let simulated = &mut self.simulated;
            scan_windows(&synthetic, &self.model, &self.zones, max_dur, |zone, duration, score| {
                let candidate = Candidate { zone, duration, score };
                policy.store(simulated, max_dur, candidate)
            });

            trace!(replicate, best = self.simulated.score(replicate), "replicate done");
        }
    }

    /// Observed results: one row, or `num_zones × max_dur` rows in
    /// zone-major order.
    pub fn observed_table(&self) -> ScanTable {
        self.observed.to_table()
    }

    /// One best result per replicate.
    pub fn simulated_table(&self) -> ScanTable {
        self.simulated.to_table()
    }
}
