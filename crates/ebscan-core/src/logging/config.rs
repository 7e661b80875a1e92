//! Logging configuration.
//!
//! Resolution, highest first:
//! 1. `-q` / `-v` and `--log-format`
//! 2. `EBSCAN_LOG` and `EBSCAN_LOG_FORMAT`
//! 3. `RUST_LOG` directives, passed to the filter untouched
//! 4. `info`, human format

use clap::ValueEnum;

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable console lines.
    #[default]
    Human,
    /// One JSON object per event.
    #[value(alias = "json")]
    Jsonl,
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    #[value(alias = "warning")]
    Warn,
    Error,
    #[value(alias = "quiet")]
    Off,
}

impl LogLevel {
    /// Level implied by `-q` and the `-v` count.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return LogLevel::Error;
        }
        match verbose {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved logging setup for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Raw `RUST_LOG` directives; only kept when no explicit level was given.
    pub directives: Option<String>,
    /// ANSI colors in human output (still requires a terminal).
    pub color: bool,
}

impl LogConfig {
    /// Resolve from the process environment and the global CLI flags.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>, no_color: bool) -> Self {
        Self::from_vars(
            std::env::var("EBSCAN_LOG").ok().as_deref(),
            std::env::var("RUST_LOG").ok().as_deref(),
            std::env::var("EBSCAN_LOG_FORMAT").ok().as_deref(),
            cli_level,
            cli_format,
            no_color || std::env::var_os("NO_COLOR").is_some(),
        )
    }

    fn from_vars(
        ebscan_log: Option<&str>,
        rust_log: Option<&str>,
        log_format: Option<&str>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
        no_color: bool,
    ) -> Self {
        // Unparseable values fall through to the next source.
        let level = cli_level.or_else(|| ebscan_log.and_then(|v| LogLevel::from_str(v.trim(), true).ok()));
        let directives = match level {
            Some(_) => None,
            None => rust_log.map(str::trim).filter(|d| !d.is_empty()).map(String::from),
        };
        let format = cli_format
            .or_else(|| log_format.and_then(|v| LogFormat::from_str(v.trim(), true).ok()))
            .unwrap_or_default();

        LogConfig {
            format,
            level: level.unwrap_or_default(),
            directives,
            color: !no_color,
        }
    }

    /// Filter directives handed to `EnvFilter`.
    pub fn filter_directives(&self) -> String {
        match self.directives {
            Some(ref d) => d.clone(),
            None => format!("ebscan_core={0},ebscan={0}", self.level),
        }
    }
}
