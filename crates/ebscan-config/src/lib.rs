//! ebscan configuration and input loading.
//!
//! This crate provides:
//! - Typed Rust structs for settings.json and the scan input file
//! - Settings resolution (CLI → env → XDG → defaults)
//! - Shape and semantic validation of scan inputs
//! - Content hashing of input files for report provenance

pub mod input;
pub mod load;
pub mod resolve;
pub mod settings;
pub mod validate;

pub use input::{ScanData, ScanInput, ZoneSpec};
pub use load::{load_input, load_settings, ConfigError, LoadedInput, ResolvedSettings};
pub use resolve::{resolve_settings, ConfigSource};
pub use settings::{ScanSettings, SettingsOverrides};
pub use validate::{InputShape, ValidationError, ValidationResult};

/// Schema version for settings files.
pub const CONFIG_SCHEMA_VERSION: &str = ebscan_common::SCHEMA_VERSION;
