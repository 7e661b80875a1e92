//! Expectation-based negative binomial space-time scan.
//!
//! The engine scores every (zone, duration) window of a count grid against
//! per-cell baselines, keeps either every score or only the best, and
//! calibrates the observed maximum with Monte Carlo replicates drawn from the
//! negative binomial null model.

pub mod calibrate;
pub mod clusters;
pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod scan;
pub mod schema;

pub use exit_codes::ExitCode;
pub use pipeline::{run_pipeline, Provenance};
pub use report::ScanReport;
pub use scan::{EbNegBinModel, Retention, ScanEngine, ScanModel};
