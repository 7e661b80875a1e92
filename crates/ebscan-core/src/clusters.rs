//! Ranking observed windows into reportable clusters.

use ebscan_common::{ScanRecord, ScanTable, ZoneSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::calibrate::{NullDistribution, Significance};

/// A reported space-time cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Cluster {
    /// 1-based rank by score.
    pub rank: usize,
    /// 1-based zone number.
    pub zone: usize,
    /// 1-based duration.
    pub duration: usize,
    pub score: f64,
    /// 0-based location ids of the zone.
    pub locations: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_names: Option<Vec<String>>,
    #[serde(flatten)]
    pub significance: Significance,
}

/// Options for [`top_clusters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterOptions {
    /// Maximum number of clusters.
    pub limit: usize,
    /// Keep zones that share locations with a higher-ranked cluster.
    pub overlapping: bool,
}

/// Shared lookups for building clusters.
pub struct ClusterContext<'a> {
    pub zones: &'a ZoneSet,
    pub null: &'a NullDistribution,
    pub location_names: Option<&'a [String]>,
}

impl ClusterContext<'_> {
    fn cluster(&self, rank: usize, record: &ScanRecord) -> Cluster {
        let locations = self.zones.zone(record.zone - 1).to_vec();
        let location_names = self.location_names.map(|names| {
            locations
                .iter()
                .map(|&loc| names.get(loc).cloned().unwrap_or_else(|| loc.to_string()))
                .collect()
        });
        Cluster {
            rank,
            zone: record.zone,
            duration: record.duration,
            score: record.score,
            locations,
            location_names,
            significance: self.null.significance(record.score),
        }
    }
}

/// The highest-scoring observed window, if any was stored.
pub fn most_likely_cluster(table: &ScanTable, ctx: &ClusterContext<'_>) -> Option<Cluster> {
    table
        .best()
        .filter(|r| r.zone > 0)
        .map(|r| ctx.cluster(1, r))
}

/// Best duration per zone, ranked by score, optionally non-overlapping.
///
/// `table` must list each zone's rows contiguously, as the engine does.
/// Equal scores keep zone order; NaN scores rank last.
pub fn top_clusters(
    table: &ScanTable,
    ctx: &ClusterContext<'_>,
    options: ClusterOptions,
) -> Vec<Cluster> {
    let mut per_zone: Vec<ScanRecord> = Vec::new();
    for row in table.iter().filter(|r| r.zone > 0) {
        match per_zone.last_mut().filter(|b| b.zone == row.zone) {
            Some(best) => {
                if row.score > best.score || (best.score.is_nan() && !row.score.is_nan()) {
                    *best = *row;
                }
            }
            None => per_zone.push(*row),
        }
    }

    per_zone.sort_by(|a, b| {
        a.score
            .is_nan()
            .cmp(&b.score.is_nan())
            .then_with(|| b.score.total_cmp(&a.score))
    });

    let mut selected: Vec<ScanRecord> = Vec::new();
    for candidate in per_zone {
        if selected.len() >= options.limit {
            break;
        }
        let clashes = !options.overlapping
            && selected
                .iter()
                .any(|s| ctx.zones.overlaps(s.zone - 1, candidate.zone - 1));
        if !clashes {
            selected.push(candidate);
        }
    }

    selected
        .iter()
        .enumerate()
        .map(|(i, r)| ctx.cluster(i + 1, r))
        .collect()
}
