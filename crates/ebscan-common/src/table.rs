//! Scan result tables.
//!
//! These are the external output contract: one table for the observed scan
//! and one for the Monte Carlo replicates, each with columns zone (1-based),
//! duration (1-based) and score.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One (zone, duration, score) result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScanRecord {
    /// 1-based zone number (input order).
    pub zone: usize,
    /// 1-based duration (number of most recent periods).
    pub duration: usize,
    /// Window score. NaN and ±Inf serialize as `null`.
    pub score: f64,
}

impl ScanRecord {
    pub fn new(zone: usize, duration: usize, score: f64) -> Self {
        Self {
            zone,
            duration,
            score,
        }
    }
}

/// An ordered list of scan results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ScanTable {
    pub rows: Vec<ScanRecord>,
}

impl ScanTable {
    pub fn new(rows: Vec<ScanRecord>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScanRecord> {
        self.rows.iter()
    }

    /// Score column.
    pub fn scores(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.score).collect()
    }

    /// First row with the strictly highest score (NaN never wins).
    pub fn best(&self) -> Option<&ScanRecord> {
        let mut best: Option<&ScanRecord> = None;
        for row in &self.rows {
            let better = match best {
                Some(b) => row.score > b.score,
                None => !row.score.is_nan(),
            };
            if better {
                best = Some(row);
            }
        }
        best
    }
}

impl<'a> IntoIterator for &'a ScanTable {
    type Item = &'a ScanRecord;
    type IntoIter = std::slice::Iter<'a, ScanRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
