//! Loading settings and scan input from disk.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::input::{ScanData, ScanInput};
use crate::resolve::{resolve_settings, ConfigSource};
use crate::settings::ScanSettings;
use crate::validate::ValidationError;

/// Errors that can occur while loading files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
}

impl From<ConfigError> for ebscan_common::Error {
    fn from(err: ConfigError) -> Self {
        use ebscan_common::Error;
        match err {
            ConfigError::NotFound { path } => {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("file not found: {}", path.display()),
                ))
            }
            ConfigError::ParseError { source, .. } => Error::Json(source),
            ConfigError::IoError { source, .. } => Error::Io(source),
            ConfigError::Validation(v) => v.into(),
        }
    }
}

impl ConfigError {
    /// Convert an error raised while loading the scan input.
    pub fn into_input_error(self) -> ebscan_common::Error {
        match self {
            ConfigError::ParseError { path, source } => ebscan_common::Error::Input(format!(
                "invalid JSON in {}: {}",
                path.display(),
                source
            )),
            other => other.into(),
        }
    }

    /// Convert an error raised while loading or checking settings.
    pub fn into_settings_error(self) -> ebscan_common::Error {
        use ebscan_common::Error;
        match self {
            ConfigError::ParseError { path, source } => {
                Error::Config(format!("invalid JSON in {}: {}", path.display(), source))
            }
            ConfigError::Validation(ValidationError::VersionMismatch { expected, actual }) => {
                Error::VersionMismatch { expected, actual }
            }
            ConfigError::Validation(v) => Error::InvalidSettings(v.to_string()),
            other => other.into(),
        }
    }
}

/// A validated scan input with provenance.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub data: ScanData,
    pub path: PathBuf,
    /// SHA-256 hex digest of the file content.
    pub sha256: String,
}

/// Settings with the path and source they were resolved from.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub settings: ScanSettings,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Load and validate a scan input file.
pub fn load_input(path: &Path) -> Result<LoadedInput, ConfigError> {
    let content = read_file(path)?;
    let sha256 = hash_content(&content);

    let input: ScanInput =
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
    let data = ScanData::try_from(input)?;

    Ok(LoadedInput {
        data,
        path: path.to_path_buf(),
        sha256,
    })
}

/// Resolve and load the settings file, falling back to defaults.
///
/// Only parsing happens here; range checks that depend on the input run in
/// [`crate::validate::validate_settings`].
pub fn load_settings(cli_path: Option<&Path>) -> Result<ResolvedSettings, ConfigError> {
    let (path, source) = resolve_settings(cli_path);

    let settings = match path {
        Some(ref p) => {
            let content = read_file(p)?;
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: p.clone(),
                source: e,
            })?
        }
        None => ScanSettings::default(),
    };

    Ok(ResolvedSettings {
        settings,
        path,
        source,
    })
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::IoError {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Hash content with SHA-256 and return hex string.
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}
