//! Scan input file format.
//!
//! ```json
//! {
//!   "counts":         [[1, 0, 4], [2, 1, 3]],
//!   "baselines":      [[1.2, 0.8, 3.1], [1.5, 0.9, 2.7]],
//!   "overdispersion": [[2.0, 2.0, 2.0], [2.0, 2.0, 2.0]],
//!   "zones":          [[0], [1], [2], [0, 1], [1, 2]],
//!   "location_names": ["north", "centre", "south"]
//! }
//! ```
//!
//! Matrices are time × location with row 0 the most recent period. Zones are
//! 0-based location ids, either nested or as `{"ids": [...], "lengths": [...]}`.
//! Omitting `overdispersion` means a Poisson null model (every cell `+inf`).

use ebscan_common::{Grid, ZoneSet};
use serde::{Deserialize, Serialize};

use crate::validate::{validate_input, ValidationError, ValidationResult};

/// Zone set as written in the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoneSpec {
    /// One list of location ids per zone.
    Nested(Vec<Vec<usize>>),
    /// Concatenated ids plus a per-zone length table.
    Flat { ids: Vec<usize>, lengths: Vec<usize> },
}

impl ZoneSpec {
    /// Number of zones described.
    pub fn len(&self) -> usize {
        match self {
            ZoneSpec::Nested(zones) => zones.len(),
            ZoneSpec::Flat { lengths, .. } => lengths.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to a [`ZoneSet`]; `None` if a flat length table is inconsistent.
    pub fn to_zone_set(&self) -> Option<ZoneSet> {
        match self {
            ZoneSpec::Nested(zones) => Some(ZoneSet::from_nested(zones)),
            ZoneSpec::Flat { ids, lengths } => ZoneSet::from_flat(ids.clone(), lengths),
        }
    }
}

/// Raw scan input as deserialized from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanInput {
    pub counts: Vec<Vec<u64>>,

    pub baselines: Vec<Vec<f64>>,

    #[serde(default)]
    pub overdispersion: Option<Vec<Vec<f64>>>,

    pub zones: ZoneSpec,

    #[serde(default)]
    pub location_names: Option<Vec<String>>,
}

/// Validated scan input in engine-ready form.
#[derive(Debug, Clone)]
pub struct ScanData {
    pub counts: Grid<u64>,
    pub baselines: Grid<f64>,
    pub overdispersion: Grid<f64>,
    pub zones: ZoneSet,
    pub location_names: Option<Vec<String>>,
}

impl ScanData {
    /// Number of time periods.
    pub fn num_times(&self) -> usize {
        self.counts.rows()
    }

    /// Number of locations.
    pub fn num_locs(&self) -> usize {
        self.counts.cols()
    }

    /// Number of zones.
    pub fn num_zones(&self) -> usize {
        self.zones.len()
    }

    /// Display label for a location id.
    pub fn location_label(&self, loc: usize) -> String {
        self.location_names
            .as_ref()
            .and_then(|names| names.get(loc))
            .cloned()
            .unwrap_or_else(|| loc.to_string())
    }
}

impl TryFrom<ScanInput> for ScanData {
    type Error = ValidationError;

    fn try_from(input: ScanInput) -> ValidationResult<Self> {
        let shape = validate_input(&input)?;
        let ragged = |field: &str| ValidationError::ShapeMismatch {
            field: field.to_string(),
            expected: format!("{}x{}", shape.num_times, shape.num_locs),
            actual: "ragged rows".to_string(),
        };

        let counts = Grid::from_rows(input.counts).ok_or_else(|| ragged("counts"))?;
        let baselines = Grid::from_rows(input.baselines).ok_or_else(|| ragged("baselines"))?;
        let overdispersion = match input.overdispersion {
            Some(rows) => Grid::from_rows(rows).ok_or_else(|| ragged("overdispersion"))?,
            None => Grid::filled(shape.num_times, shape.num_locs, f64::INFINITY),
        };
        let zones = input.zones.to_zone_set().ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "zones.lengths".to_string(),
                message: "lengths must sum to the number of ids".to_string(),
            }
        })?;

        Ok(ScanData {
            counts,
            baselines,
            overdispersion,
            zones,
            location_names: input.location_names,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = r#"{
        "counts": [[1, 0, 4], [2, 1, 3]],
        "baselines": [[1.2, 0.8, 3.1], [1.5, 0.9, 2.7]],
        "overdispersion": [[2.0, 2.0, 2.0], [2.0, 2.0, 2.0]],
        "zones": [[0], [1], [2], [0, 1], [1, 2]],
        "location_names": ["north", "centre", "south"]
    }"#;

    #[test]
    fn parses_nested_zones() {
        let input = serde_json::from_str::<ScanInput>(SMALL).unwrap();
        assert_eq!(input.zones.len(), 5);
        let data = ScanData::try_from(input).unwrap();
        assert_eq!(data.num_times(), 2);
        assert_eq!(data.num_locs(), 3);
        assert_eq!(data.num_zones(), 5);
        assert_eq!(data.zones.zone(4), &[1, 2]);
        assert_eq!(data.counts[(0, 2)], 4);
        assert_eq!(data.location_label(1), "centre");
    }

    #[test]
    fn parses_flat_zones() {
        let json = r#"{
            "counts": [[1, 2]],
            "baselines": [[1.0, 1.0]],
            "zones": {"ids": [0, 1, 0, 1], "lengths": [1, 1, 2]}
        }"#;
        let data = ScanData::try_from(serde_json::from_str::<ScanInput>(json).unwrap()).unwrap();
        assert_eq!(data.num_zones(), 3);
        assert_eq!(data.zones.zone(2), &[0, 1]);
    }

    #[test]
    fn missing_overdispersion_is_poisson() {
        let json = r#"{"counts": [[1]], "baselines": [[1.0]], "zones": [[0]]}"#;
        let data = ScanData::try_from(serde_json::from_str::<ScanInput>(json).unwrap()).unwrap();
        assert_eq!(data.overdispersion[(0, 0)], f64::INFINITY);
        assert_eq!(data.location_label(0), "0");
    }

    #[test]
    fn negative_counts_do_not_deserialize() {
        let err = serde_json::from_str::<ScanInput>(r#"{"counts": [[-1]]}"#).unwrap_err();
        assert!(err.is_data());
    }
}
