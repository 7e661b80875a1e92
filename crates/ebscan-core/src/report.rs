//! Scan report: the document `ebscan run` writes to stdout.

use chrono::{DateTime, Utc};
use ebscan_common::ScanTable;
use ebscan_config::ScanSettings;
use ebscan_math::GumbelParams;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::clusters::Cluster;

/// Complete result of one scan run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScanReport {
    pub schema_version: String,

    /// Unique id of the run that produced this report.
    pub run_id: String,

    pub computed_at: DateTime<Utc>,

    pub input: InputSummary,

    /// Effective settings after file and CLI overrides.
    pub settings: ScanSettings,

    /// Where the settings came from.
    pub settings_source: String,

    /// Longest duration scanned.
    pub max_duration: usize,

    /// Observed results (one row, or every zone × duration).
    pub observed: ScanTable,

    /// Best result of each Monte Carlo replicate.
    pub simulated: ScanTable,

    /// Most likely cluster.
    pub mlc: Option<Cluster>,

    /// Ranked clusters.
    pub clusters: Vec<Cluster>,

    /// Gumbel fit to the replicate maxima, when requested and possible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gumbel: Option<GumbelFit>,
}

/// What was scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InputSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 of the input file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    pub num_times: usize,
    pub num_locs: usize,
    pub num_zones: usize,
}

/// Gumbel location/scale fitted to replicate maxima.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GumbelFit {
    pub location: f64,
    pub scale: f64,
}

impl From<GumbelParams> for GumbelFit {
    fn from(p: GumbelParams) -> Self {
        GumbelFit {
            location: p.location,
            scale: p.scale,
        }
    }
}

impl ScanReport {
    /// Number of windows scored per pass.
    pub fn windows_per_pass(&self) -> usize {
        self.input.num_zones * self.max_duration
    }

    /// Number of Monte Carlo replicates run.
    pub fn replicates(&self) -> usize {
        self.simulated.len()
    }
}
