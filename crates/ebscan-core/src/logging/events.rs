//! Event vocabulary for structured logs.
//!
//! Every pipeline event carries the run id, the stage and a stable event
//! name so JSONL logs can be filtered without parsing messages.

use serde::{Deserialize, Serialize};

/// Processing stages of a scan run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and settings resolution.
    Init,
    /// Input loading and validation.
    Load,
    /// Observed scan.
    Scan,
    /// Monte Carlo replicates.
    Simulate,
    /// P-values and cluster ranking.
    Calibrate,
    /// Report rendering.
    Report,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Init => "init",
            Stage::Load => "load",
            Stage::Scan => "scan",
            Stage::Simulate => "simulate",
            Stage::Calibrate => "calibrate",
            Stage::Report => "report",
        };
        write!(f, "{}", s)
    }
}

/// Standard event names used in logging.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    pub const INPUT_LOADED: &str = "input.loaded";

    pub const SCAN_STARTED: &str = "scan.started";
    pub const SCAN_FINISHED: &str = "scan.finished";

    pub const MCSIM_STARTED: &str = "mcsim.started";
    pub const MCSIM_FINISHED: &str = "mcsim.finished";

    pub const CALIBRATE_FINISHED: &str = "calibrate.finished";

    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_ERROR: &str = "config.error";
}

/// Correlation ids attached to every event of a run.
#[derive(Debug, Clone)]
pub struct LogContext {
    /// Unique id of this invocation.
    pub run_id: String,
    /// Short digest of the input file, once loaded.
    pub input_id: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            input_id: None,
        }
    }

    /// Set the input id from a content digest (first 12 hex chars).
    pub fn with_input_digest(mut self, sha256: &str) -> Self {
        self.input_id = Some(sha256.chars().take(12).collect());
        self
    }
}
