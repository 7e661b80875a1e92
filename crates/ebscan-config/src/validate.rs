//! Input validation errors and semantic validation.

use thiserror::Error;

use crate::input::{ScanInput, ZoneSpec};
use crate::settings::ScanSettings;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Input and settings validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Shape mismatch for {field}: expected {expected}, got {actual}")]
    ShapeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Zone {zone} references location {location}, but only {num_locs} locations exist")]
    ZoneOutOfRange {
        zone: usize,
        location: usize,
        num_locs: usize,
    },

    #[error("Input is empty: {0}")]
    EmptyInput(String),

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::ShapeMismatch { .. } => 62,
            ValidationError::InvalidValue { .. } => 63,
            ValidationError::ZoneOutOfRange { .. } => 64,
            ValidationError::EmptyInput(_) => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

impl From<ValidationError> for ebscan_common::Error {
    fn from(err: ValidationError) -> Self {
        use ebscan_common::Error;
        match err {
            ValidationError::ShapeMismatch {
                field,
                expected,
                actual,
            } => Error::InvalidInput {
                field,
                message: format!("expected shape {}, got {}", expected, actual),
            },
            ValidationError::InvalidValue { field, message } => {
                Error::InvalidInput { field, message }
            }
            ValidationError::ZoneOutOfRange {
                zone,
                location,
                num_locs,
            } => Error::ZoneOutOfRange {
                zone,
                location,
                num_locs,
            },
            ValidationError::EmptyInput(msg) => Error::Input(msg),
            ValidationError::VersionMismatch { expected, actual } => {
                Error::VersionMismatch { expected, actual }
            }
        }
    }
}

/// Dimensions of a validated input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputShape {
    pub num_times: usize,
    pub num_locs: usize,
    pub num_zones: usize,
}

/// Validate a scan input and return its dimensions.
pub fn validate_input(input: &ScanInput) -> ValidationResult<InputShape> {
    let num_times = input.counts.len();
    if num_times == 0 {
        return Err(ValidationError::EmptyInput(
            "counts has no time periods".to_string(),
        ));
    }
    let num_locs = input.counts[0].len();
    if num_locs == 0 {
        return Err(ValidationError::EmptyInput(
            "counts has no locations".to_string(),
        ));
    }

    check_shape("counts", &input.counts, num_times, num_locs)?;
    check_shape("baselines", &input.baselines, num_times, num_locs)?;

    for (t, row) in input.baselines.iter().enumerate() {
        for (l, &mu) in row.iter().enumerate() {
            if !(mu.is_finite() && mu > 0.0) {
                return Err(ValidationError::InvalidValue {
                    field: format!("baselines[{}][{}]", t, l),
                    message: format!("Must be positive and finite, got {}", mu),
                });
            }
        }
    }

    if let Some(ref overdispersion) = input.overdispersion {
        check_shape("overdispersion", overdispersion, num_times, num_locs)?;
        for (t, row) in overdispersion.iter().enumerate() {
            for (l, &omega) in row.iter().enumerate() {
                // +inf is the Poisson limit
                if omega.is_nan() || omega <= 0.0 {
                    return Err(ValidationError::InvalidValue {
                        field: format!("overdispersion[{}][{}]", t, l),
                        message: format!("Must be positive, got {}", omega),
                    });
                }
            }
        }
    }

    let num_zones = validate_zones(&input.zones, num_locs)?;

    if let Some(ref names) = input.location_names {
        if names.len() != num_locs {
            return Err(ValidationError::ShapeMismatch {
                field: "location_names".to_string(),
                expected: num_locs.to_string(),
                actual: names.len().to_string(),
            });
        }
    }

    Ok(InputShape {
        num_times,
        num_locs,
        num_zones,
    })
}

fn check_shape<T>(
    field: &str,
    rows: &[Vec<T>],
    num_times: usize,
    num_locs: usize,
) -> ValidationResult<()> {
    if rows.len() != num_times {
        return Err(ValidationError::ShapeMismatch {
            field: field.to_string(),
            expected: format!("{} rows", num_times),
            actual: format!("{} rows", rows.len()),
        });
    }
    for (t, row) in rows.iter().enumerate() {
        if row.len() != num_locs {
            return Err(ValidationError::ShapeMismatch {
                field: format!("{}[{}]", field, t),
                expected: format!("{} columns", num_locs),
                actual: format!("{} columns", row.len()),
            });
        }
    }
    Ok(())
}

fn validate_zones(zones: &ZoneSpec, num_locs: usize) -> ValidationResult<usize> {
    if zones.is_empty() {
        return Err(ValidationError::EmptyInput("zones is empty".to_string()));
    }

    let zone_set = zones.to_zone_set().ok_or_else(|| ValidationError::InvalidValue {
        field: "zones.lengths".to_string(),
        message: "Lengths must sum to the number of ids".to_string(),
    })?;

    for (z, zone) in zone_set.iter().enumerate() {
        if zone.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("zones[{}]", z),
                message: "Zone has no locations".to_string(),
            });
        }
        if let Some(&location) = zone.iter().find(|&&loc| loc >= num_locs) {
            return Err(ValidationError::ZoneOutOfRange {
                zone: z,
                location,
                num_locs,
            });
        }
    }

    Ok(zone_set.len())
}

/// Validate settings against an input with `num_times` periods.
pub fn validate_settings(settings: &ScanSettings, num_times: usize) -> ValidationResult<()> {
    if settings.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: settings.schema_version.clone(),
        });
    }

    let max_dur = settings.effective_max_duration(num_times);
    if max_dur == 0 || max_dur > num_times {
        return Err(ValidationError::InvalidValue {
            field: "max_duration".to_string(),
            message: format!("Must be in [1, {}], got {}", num_times, max_dur),
        });
    }

    Ok(())
}
