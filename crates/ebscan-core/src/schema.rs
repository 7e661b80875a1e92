//! JSON Schema generation for report and settings types.
//!
//! ```bash
//! ebscan schema --list
//! ebscan schema ScanReport
//! ebscan schema            # every schema, keyed by name
//! ```

use schemars::schema_for;
use serde_json::Value;
use std::collections::BTreeMap;

pub use crate::calibrate::Significance;
pub use crate::clusters::Cluster;
pub use crate::report::{GumbelFit, InputSummary, ScanReport};
pub use ebscan_common::{ScanRecord, ScanTable, ScoreKind};
pub use ebscan_config::ScanSettings;

/// Available schema types with their descriptions.
pub fn available_schemas() -> Vec<(&'static str, &'static str)> {
    vec![
        ("ScanReport", "Complete result of one scan run"),
        ("InputSummary", "Dimensions and digest of the scanned input"),
        ("ScanTable", "Ordered rows of (zone, duration, score)"),
        ("ScanRecord", "One result row with 1-based zone and duration"),
        ("Cluster", "Ranked cluster with locations and p-values"),
        ("Significance", "Monte Carlo and Gumbel p-values"),
        ("GumbelFit", "Gumbel parameters fitted to replicate maxima"),
        ("ScanSettings", "Contents of settings.json"),
        ("ScoreKind", "Score function (hotspot or emerging)"),
    ]
}

/// Generate JSON Schema for a type by name.
///
/// Returns None if the type is unknown.
pub fn generate_schema(type_name: &str) -> Option<Value> {
    let schema = match type_name {
        "ScanReport" => schema_for!(ScanReport),
        "InputSummary" => schema_for!(InputSummary),
        "ScanTable" => schema_for!(ScanTable),
        "ScanRecord" => schema_for!(ScanRecord),
        "Cluster" => schema_for!(Cluster),
        "Significance" => schema_for!(Significance),
        "GumbelFit" => schema_for!(GumbelFit),
        "ScanSettings" => schema_for!(ScanSettings),
        "ScoreKind" => schema_for!(ScoreKind),
        _ => return None,
    };

    serde_json::to_value(schema).ok()
}

/// Generate all schemas as a map from type name to schema.
pub fn generate_all_schemas() -> BTreeMap<String, Value> {
    available_schemas()
        .into_iter()
        .filter_map(|(name, _)| generate_schema(name).map(|s| (name.to_string(), s)))
        .collect()
}

/// Schema output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// Pretty-printed JSON (default)
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

/// Format a schema value for output.
pub fn format_schema(schema: &Value, format: SchemaFormat) -> Result<String, serde_json::Error> {
    match format {
        SchemaFormat::Json => serde_json::to_string_pretty(schema),
        SchemaFormat::JsonCompact => serde_json::to_string(schema),
    }
}
