//! ebscan common types and errors.
//!
//! This crate provides foundational types shared across the ebscan crates:
//! - Time × location grids for counts, baselines and overdispersion
//! - Flattened zone sets
//! - Scan result tables (the external output contract)
//! - Score selection and output format enums
//! - Common error types

pub mod error;
pub mod grid;
pub mod output;
pub mod score;
pub mod table;
pub mod zones;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use grid::Grid;
pub use output::OutputFormat;
pub use score::ScoreKind;
pub use table::{ScanRecord, ScanTable};
pub use zones::ZoneSet;

/// Schema version of the report and settings formats.
pub const SCHEMA_VERSION: &str = "1.0.0";
