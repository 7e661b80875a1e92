//! Error types for ebscan.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! ```text
//! ✗ Invalid Scan Input
//!   Reason: invalid input field overdispersion[3][0]: must be positive, got 0
//!   Fix: Check the input file against 'ebscan check --input <file>'.
//! ```
//!
//! # Machine-Facing Output
//!
//! ```json
//! {
//!   "code": 21,
//!   "category": "input",
//!   "message": "invalid input field overdispersion[3][0]: must be positive, got 0",
//!   "context": { "field": "overdispersion[3][0]" }
//! }
//! ```
//!
//! The scan engine itself never returns these: its inputs are caller
//! guaranteed. Errors are raised at the configuration and I/O boundary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for ebscan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Settings file errors.
    Config,
    /// Input data errors (shapes, parameters, zones).
    Input,
    /// Scan and calibration errors.
    Scan,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Scan => write!(f, "scan"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for ebscan.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("settings schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },

    // Input errors (20-29)
    #[error("invalid scan input: {0}")]
    Input(String),

    #[error("invalid input field {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("zone {zone} references location {location}, but only {num_locs} locations exist")]
    ZoneOutOfRange {
        zone: usize,
        location: usize,
        num_locs: usize,
    },

    // Scan errors (30-39)
    #[error("scan failed: {0}")]
    Scan(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Scan errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidSettings(_) => 11,
            Error::VersionMismatch { .. } => 12,
            Error::Input(_) => 20,
            Error::InvalidInput { .. } => 21,
            Error::ZoneOutOfRange { .. } => 22,
            Error::Scan(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidSettings(_) | Error::VersionMismatch { .. } => {
                ErrorCategory::Config
            }
            Error::Input(_) | Error::InvalidInput { .. } | Error::ZoneOutOfRange { .. } => {
                ErrorCategory::Input
            }
            Error::Scan(_) => ErrorCategory::Scan,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) | Error::InvalidSettings(_) => {
                "Check the settings file syntax, or remove it to use built-in defaults."
            }
            Error::VersionMismatch { .. } => {
                "Update the settings file's schema_version to the version this build expects."
            }
            Error::Input(_) | Error::InvalidInput { .. } => {
                "Check the input file against 'ebscan check --input <file>'."
            }
            Error::ZoneOutOfRange { .. } => {
                "Zone location ids are 0-based and must be smaller than the number of count columns."
            }
            Error::Scan(_) => {
                "Check baselines and overdispersion for extreme magnitudes; otherwise report a bug with the input file."
            }
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Json(_) => "Invalid JSON in file. Check syntax with 'jq . <file>'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidSettings(_) => "Invalid Settings",
            Error::VersionMismatch { .. } => "Settings Version Mismatch",
            Error::Input(_) | Error::InvalidInput { .. } => "Invalid Scan Input",
            Error::ZoneOutOfRange { .. } => "Zone Out Of Range",
            Error::Scan(_) => "Scan Error",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Machine-readable form of an [`Error`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Additional structured context (e.g., field, zone).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidInput { field, .. } => {
                context.insert("field".to_string(), serde_json::json!(field));
            }
            Error::ZoneOutOfRange {
                zone,
                location,
                num_locs,
            } => {
                context.insert("zone".to_string(), serde_json::json!(zone));
                context.insert("location".to_string(), serde_json::json!(location));
                context.insert("num_locs".to_string(), serde_json::json!(num_locs));
            }
            Error::VersionMismatch { expected, actual } => {
                context.insert("expected".to_string(), serde_json::json!(expected));
                context.insert("actual".to_string(), serde_json::json!(actual));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            context,
        }
    }
}

impl StructuredError {
    /// Add additional context to the error.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
