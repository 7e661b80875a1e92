//! Structured logging for ebscan.
//!
//! stdout carries the report, so every log line goes to stderr: console
//! lines for interactive use, JSON lines (`--log-format jsonl`) for pipelines.

pub mod config;
pub mod events;

pub use config::{LogConfig, LogFormat, LogLevel};
pub use events::{event_names, LogContext, Stage};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Call once, before the first event.
pub fn init_logging(config: &LogConfig) {
    // Malformed RUST_LOG directives degrade to the level default.
    let filter = EnvFilter::try_new(config.filter_directives()).unwrap_or_else(|_| {
        EnvFilter::new(format!("ebscan_core={0},ebscan={0}", config.level))
    });

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Human => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(config.color && std::io::stderr().is_terminal()),
            )
            .try_init(),
        LogFormat::Jsonl => registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    // A subscriber installed earlier (tests, embedding) stays in place.
    let _ = result;
}

/// Unique id for one invocation, `run-` plus 12 hex chars.
pub fn generate_run_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(12);
    format!("run-{}", id)
}

/// Emit an event tagged with the run context, its name and its stage.
///
/// ```ignore
/// log_event!(ctx, INFO, event_names::SCAN_FINISHED, Stage::Scan, "observed scan done",
///     windows = 120);
/// ```
#[macro_export]
macro_rules! log_event {
    ($ctx:expr, $level:ident, $event:expr, $stage:expr, $msg:expr $(, $key:ident = $val:expr)*) => {
        tracing::event!(
            tracing::Level::$level,
            event = $event,
            run_id = %$ctx.run_id,
            input_id = ?$ctx.input_id,
            stage = %$stage,
            $($key = $val,)*
            "{}", $msg
        )
    };
}
