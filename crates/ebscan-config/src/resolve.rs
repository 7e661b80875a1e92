//! Settings path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG config →
//! system config → built-in defaults.

use std::path::{Path, PathBuf};

/// Where the settings file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via `--settings`.
    CliArgument,

    /// Set via `EBSCAN_SETTINGS` or `EBSCAN_CONFIG_DIR`.
    Environment,

    /// Found in the XDG config directory.
    XdgConfig,

    /// Found in /etc/ebscan/.
    SystemConfig,

    /// No file; built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

const ENV_SETTINGS_PATH: &str = "EBSCAN_SETTINGS";
const ENV_CONFIG_DIR: &str = "EBSCAN_CONFIG_DIR";

const SETTINGS_FILENAME: &str = "settings.json";

const APP_NAME: &str = "ebscan";

/// Resolve the settings file path.
///
/// An explicit CLI path is returned even if it does not exist, so the loader
/// can report it; discovered paths are only returned when present.
pub fn resolve_settings(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), ConfigSource::CliArgument);
    }

    if let Ok(env_path) = std::env::var(ENV_SETTINGS_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(SETTINGS_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(SETTINGS_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    let system_path = system_config_dir().join(SETTINGS_FILENAME);
    if system_path.exists() {
        return (Some(system_path), ConfigSource::SystemConfig);
    }

    (None, ConfigSource::BuiltinDefault)
}

/// XDG config directory for ebscan.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// System config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_source_display() {
        assert_eq!(ConfigSource::CliArgument.to_string(), "CLI argument");
        assert_eq!(ConfigSource::Environment.to_string(), "environment variable");
        assert_eq!(ConfigSource::BuiltinDefault.to_string(), "builtin default");
    }

    #[test]
    fn cli_path_wins_even_if_missing() {
        let missing = Path::new("/nonexistent/ebscan/settings.json");
        let (path, source) = resolve_settings(Some(missing));
        assert_eq!(path.as_deref(), Some(missing));
        assert_eq!(source, ConfigSource::CliArgument);
    }

    #[test]
    fn system_dir_is_under_etc() {
        assert_eq!(system_config_dir(), PathBuf::from("/etc/ebscan"));
    }
}
