//! Space-time scan engine.
//!
//! - [`engine`]: zone × duration enumeration and the Monte Carlo loop
//! - [`model`]: the [`ScanModel`] seam and the negative binomial model
//! - [`sampler`]: null-model count draws
//! - [`storage`]: result retention policies and result columns

pub mod engine;
pub mod model;
pub mod sampler;
pub mod storage;

pub use engine::{scan_windows, ScanEngine};
pub use model::{EbNegBinModel, ScanModel, Window};
pub use sampler::{draw_negbin, draw_poisson};
pub use storage::{Candidate, ResultColumns, Retention, StorePolicy};
