//! Scan settings.
//!
//! Every field has a default, so an empty JSON object is a valid settings
//! file. CLI flags are applied on top through [`SettingsOverrides`].

use ebscan_common::ScoreKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default number of Monte Carlo replicates.
pub const DEFAULT_NUM_MCSIM: usize = 999;

/// Default number of clusters reported besides the MLC.
pub const DEFAULT_TOP_CLUSTERS: usize = 5;

/// Complete scan settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScanSettings {
    pub schema_version: String,

    /// Score function evaluated for every window.
    pub score: ScoreKind,

    /// Keep every (zone, duration) score instead of only the best.
    pub store_everything: bool,

    /// Number of Monte Carlo replicates.
    pub num_mcsim: usize,

    /// Longest window duration; defaults to the number of time periods.
    pub max_duration: Option<usize>,

    /// Seed for the replicate generator; random when absent.
    pub seed: Option<u64>,

    /// Number of ranked clusters to report.
    pub top_clusters: usize,

    /// Allow ranked clusters to share locations.
    pub overlapping: bool,

    /// Also report Gumbel-approximated p-values.
    pub gumbel: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            score: ScoreKind::Hotspot,
            store_everything: false,
            num_mcsim: DEFAULT_NUM_MCSIM,
            max_duration: None,
            seed: None,
            top_clusters: DEFAULT_TOP_CLUSTERS,
            overlapping: false,
            gumbel: false,
        }
    }
}

impl ScanSettings {
    /// Longest duration to scan for an input with `num_times` periods.
    pub fn effective_max_duration(&self, num_times: usize) -> usize {
        self.max_duration.unwrap_or(num_times)
    }

    /// Apply CLI overrides in place.
    pub fn apply(&mut self, overrides: &SettingsOverrides) {
        if let Some(score) = overrides.score {
            self.score = score;
        }
        if let Some(on) = overrides.store_everything {
            self.store_everything = on;
        }
        if let Some(n) = overrides.num_mcsim {
            self.num_mcsim = n;
        }
        if let Some(d) = overrides.max_duration {
            self.max_duration = Some(d);
        }
        if let Some(seed) = overrides.seed {
            self.seed = Some(seed);
        }
        if let Some(k) = overrides.top_clusters {
            self.top_clusters = k;
        }
        if let Some(on) = overrides.overlapping {
            self.overlapping = on;
        }
        if let Some(on) = overrides.gumbel {
            self.gumbel = on;
        }
    }
}

/// Field-level overrides, typically from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub score: Option<ScoreKind>,
    pub store_everything: Option<bool>,
    pub num_mcsim: Option<usize>,
    pub max_duration: Option<usize>,
    pub seed: Option<u64>,
    pub top_clusters: Option<usize>,
    pub overlapping: Option<bool>,
    pub gumbel: Option<bool>,
}
