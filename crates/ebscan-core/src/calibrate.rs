//! Significance of observed scan scores against Monte Carlo replicates.
//!
//! - Empirical: `(1 + #{sim ≥ obs}) / (1 + n)`
//! - Gumbel: upper tail of a moment-fitted Gumbel over the replicate maxima,
//!   which resolves p-values below `1 / (1 + n)`

use ebscan_math::GumbelParams;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// P-values attached to one observed score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Significance {
    /// Empirical Monte Carlo p-value.
    pub mc_pvalue: Option<f64>,
    /// Gumbel-approximated p-value, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gumbel_pvalue: Option<f64>,
}

/// Replicate maxima prepared once for many observed scores.
#[derive(Debug, Clone)]
pub struct NullDistribution {
    sorted: Vec<f64>,
    gumbel: Option<GumbelParams>,
}

impl NullDistribution {
    /// Build from replicate scores. `fit_gumbel` controls the Gumbel fit.
    pub fn new(simulated: &[f64], fit_gumbel: bool) -> Self {
        let mut sorted: Vec<f64> = simulated.iter().copied().filter(|s| !s.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);
        let gumbel = if fit_gumbel {
            GumbelParams::fit_moments(simulated)
        } else {
            None
        };
        Self { sorted, gumbel }
    }

    /// Number of replicates that produced a comparable score.
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn gumbel(&self) -> Option<GumbelParams> {
        self.gumbel
    }

    /// Empirical p-value; `None` without replicates or for a NaN score.
    pub fn mc_pvalue(&self, observed: f64) -> Option<f64> {
        if self.sorted.is_empty() || observed.is_nan() {
            return None;
        }
        let below = self.sorted.partition_point(|&s| s < observed);
        let at_least = self.sorted.len() - below;
        Some((1 + at_least) as f64 / (1 + self.sorted.len()) as f64)
    }

    /// Gumbel upper-tail p-value; `None` if no fit is available.
    pub fn gumbel_pvalue(&self, observed: f64) -> Option<f64> {
        if observed.is_nan() {
            return None;
        }
        self.gumbel.map(|g| g.survival(observed))
    }

    pub fn significance(&self, observed: f64) -> Significance {
        Significance {
            mc_pvalue: self.mc_pvalue(observed),
            gumbel_pvalue: self.gumbel_pvalue(observed),
        }
    }
}

/// Empirical p-value of `observed` among `simulated`.
pub fn mc_pvalue(observed: f64, simulated: &[f64]) -> Option<f64> {
    NullDistribution::new(simulated, false).mc_pvalue(observed)
}

/// Gumbel p-value of `observed` from a moment fit to `simulated`.
pub fn gumbel_pvalue(observed: f64, simulated: &[f64]) -> Option<f64> {
    NullDistribution::new(simulated, true).gumbel_pvalue(observed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mc_pvalue_counts_ties() {
        let sims = [1.0, 2.0, 3.0, 3.0];
        assert_eq!(mc_pvalue(3.0, &sims), Some(3.0 / 5.0));
        assert_eq!(mc_pvalue(3.5, &sims), Some(1.0 / 5.0));
        assert_eq!(mc_pvalue(0.0, &sims), Some(1.0));
    }

    #[test]
    fn mc_pvalue_needs_replicates() {
        assert_eq!(mc_pvalue(1.0, &[]), None);
        assert_eq!(mc_pvalue(f64::NAN, &[1.0]), None);
    }

    #[test]
    fn gumbel_pvalue_falls_in_tail() {
        let sims: Vec<f64> = (0..200).map(|i| (i as f64) / 20.0).collect();
        let p_mid = gumbel_pvalue(5.0, &sims).unwrap();
        let p_far = gumbel_pvalue(50.0, &sims).unwrap();
        assert!(p_mid > 0.1 && p_mid < 0.9);
        assert!(p_far < 1e-6);
        assert!(p_far > 0.0);
    }

    #[test]
    fn gumbel_pvalue_needs_spread() {
        assert_eq!(gumbel_pvalue(1.0, &[2.0]), None);
        assert_eq!(gumbel_pvalue(1.0, &[2.0, 2.0, 2.0]), None);
    }

    #[test]
    fn significance_skips_gumbel_unless_fitted() {
        let null = NullDistribution::new(&[0.0, 1.0, 2.0], false);
        let sig = null.significance(1.5);
        assert_eq!(sig.mc_pvalue, Some(0.5));
        assert_eq!(sig.gumbel_pvalue, None);
        let json = serde_json::to_string(&sig).unwrap();
        assert!(!json.contains("gumbel_pvalue"));
    }
}
