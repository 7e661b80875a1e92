//! Result retention for scan passes.
//!
//! Results live in three parallel columns (zone, duration, score). Zone and
//! duration are stored 1-based; a slot that was never written holds the
//! sentinel `(0, 0, -inf)`.

use ebscan_common::{ScanRecord, ScanTable};

/// Retention chosen for the observed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retention {
    /// Keep one result per (zone, duration) pair.
    All,
    /// Keep only the highest-scoring window.
    #[default]
    Best,
}

impl Retention {
    pub fn from_store_everything(store_everything: bool) -> Self {
        if store_everything {
            Retention::All
        } else {
            Retention::Best
        }
    }

    /// Number of observed result slots for this retention.
    pub fn slots(self, num_zones: usize, max_dur: usize) -> usize {
        match self {
            Retention::All => num_zones * max_dur,
            Retention::Best => 1,
        }
    }

    pub fn policy(self) -> StorePolicy {
        match self {
            Retention::All => StorePolicy::All,
            Retention::Best => StorePolicy::Best,
        }
    }
}

/// How a scored window is written into result columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorePolicy {
    /// Slot `zone * max_dur + duration`, unconditionally.
    All,
    /// Slot 0, only if strictly better.
    Best,
    /// Slot of the current replicate, only if strictly better.
    SimBest { replicate: usize },
}

/// A scored window with 0-based zone ordinal and duration index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub zone: usize,
    pub duration: usize,
    pub score: f64,
}

impl StorePolicy {
    pub fn store(self, columns: &mut ResultColumns, max_dur: usize, c: Candidate) {
        match self {
            StorePolicy::All => columns.set(c.zone * max_dur + c.duration, c),
            StorePolicy::Best => columns.set_if_better(0, c),
            StorePolicy::SimBest { replicate } => columns.set_if_better(replicate, c),
        }
    }
}

/// Parallel zone/duration/score columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultColumns {
    zones: Vec<usize>,
    durations: Vec<usize>,
    scores: Vec<f64>,
}

impl ResultColumns {
    /// `len` sentinel slots.
    pub fn with_len(len: usize) -> Self {
        Self {
            zones: vec![0; len],
            durations: vec![0; len],
            scores: vec![f64::NEG_INFINITY; len],
        }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Reset slot `idx` to the sentinel.
    pub fn reset(&mut self, idx: usize) {
        self.zones[idx] = 0;
        self.durations[idx] = 0;
        self.scores[idx] = f64::NEG_INFINITY;
    }

    /// Reset every slot.
    pub fn reset_all(&mut self) {
        self.zones.fill(0);
        self.durations.fill(0);
        self.scores.fill(f64::NEG_INFINITY);
    }

    pub fn score(&self, idx: usize) -> f64 {
        self.scores[idx]
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    fn set(&mut self, idx: usize, c: Candidate) {
        self.zones[idx] = c.zone + 1;
        self.durations[idx] = c.duration + 1;
        self.scores[idx] = c.score;
    }

    // strict > keeps the first of equal scores and never lets NaN in
    fn set_if_better(&mut self, idx: usize, c: Candidate) {
        if c.score > self.scores[idx] {
            self.set(idx, c);
        }
    }

    /// Convert to an output table.
    pub fn to_table(&self) -> ScanTable {
        ScanTable::new(
            self.zones
                .iter()
                .zip(&self.durations)
                .zip(&self.scores)
                .map(|((&z, &d), &s)| ScanRecord::new(z, d, s))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(zone: usize, duration: usize, score: f64) -> Candidate {
        Candidate {
            zone,
            duration,
            score,
        }
    }

    #[test]
    fn store_all_uses_zone_major_slots() {
        let mut cols = ResultColumns::with_len(6);
        StorePolicy::All.store(&mut cols, 3, cand(1, 2, 0.5));
        let table = cols.to_table();
        assert_eq!(table.rows[5], ScanRecord::new(2, 3, 0.5));
        assert_eq!(table.rows[0].zone, 0);
    }

    #[test]
    fn store_all_passes_nan_through() {
        let mut cols = ResultColumns::with_len(1);
        StorePolicy::All.store(&mut cols, 1, cand(0, 0, f64::NAN));
        assert!(cols.score(0).is_nan());
    }

    #[test]
    fn store_best_is_strict() {
        let mut cols = ResultColumns::with_len(1);
        StorePolicy::Best.store(&mut cols, 4, cand(0, 0, 1.0));
        StorePolicy::Best.store(&mut cols, 4, cand(2, 1, 1.0));
        StorePolicy::Best.store(&mut cols, 4, cand(3, 3, f64::NAN));
        assert_eq!(cols.to_table().rows[0], ScanRecord::new(1, 1, 1.0));

        StorePolicy::Best.store(&mut cols, 4, cand(3, 2, 1.5));
        assert_eq!(cols.to_table().rows[0], ScanRecord::new(4, 3, 1.5));
    }

    #[test]
    fn sim_best_targets_replicate_slot() {
        let mut cols = ResultColumns::with_len(3);
        StorePolicy::SimBest { replicate: 2 }.store(&mut cols, 1, cand(0, 0, -5.0));
        let table = cols.to_table();
        assert_eq!(table.rows[2], ScanRecord::new(1, 1, -5.0));
        assert_eq!(table.rows[0].score, f64::NEG_INFINITY);
    }

    #[test]
    fn reset_restores_sentinel() {
        let mut cols = ResultColumns::with_len(2);
        StorePolicy::Best.store(&mut cols, 1, cand(0, 0, 3.0));
        cols.reset(0);
        assert_eq!(cols.to_table().rows[0], ScanRecord::new(0, 0, f64::NEG_INFINITY));
    }

    #[test]
    fn retention_slots() {
        assert_eq!(Retention::All.slots(4, 3), 12);
        assert_eq!(Retention::Best.slots(4, 3), 1);
        assert_eq!(Retention::from_store_everything(true), Retention::All);
        assert_eq!(Retention::default(), Retention::Best);
    }
}
