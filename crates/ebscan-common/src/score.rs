//! Score function selection.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which excess-risk score the scan evaluates for every window.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    /// Risk uniformly elevated over the whole window
    #[default]
    Hotspot,

    /// Risk ramping up towards the most recent period
    Emerging,
}

impl std::fmt::Display for ScoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreKind::Hotspot => write!(f, "hotspot"),
            ScoreKind::Emerging => write!(f, "emerging"),
        }
    }
}
