//! Gumbel (type I extreme value) distribution for maxima of scan statistics.
//!
//! The maximum score over many windows is approximately Gumbel distributed,
//! so fitting a Gumbel to Monte Carlo replicate maxima gives tail
//! probabilities smaller than `1 / (1 + replicates)`.
//!
//! # Parameterization
//!
//! `F(x) = exp(−exp(−(x − location) / scale))` with `scale > 0`.
//! Method-of-moments fit:
//!
//! - `scale = s · √6 / π`
//! - `location = x̄ − γ · scale` (γ = Euler–Mascheroni constant)

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Euler–Mascheroni constant.
pub const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Location/scale parameters of a Gumbel distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GumbelParams {
    pub location: f64,
    pub scale: f64,
}

impl GumbelParams {
    /// Method-of-moments fit to a sample.
    ///
    /// Returns `None` with fewer than two finite values or zero spread.
    /// Non-finite values are ignored.
    pub fn fit_moments(sample: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = sample.iter().copied().filter(|x| x.is_finite()).collect();
        if finite.len() < 2 {
            return None;
        }
        let n = finite.len() as f64;
        let mean = finite.iter().sum::<f64>() / n;
        let var = finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        if var <= 0.0 || !var.is_finite() {
            return None;
        }
        let scale = var.sqrt() * 6.0f64.sqrt() / PI;
        Some(Self {
            location: mean - EULER_GAMMA * scale,
            scale,
        })
    }

    /// CDF `P(X ≤ x)`.
    pub fn cdf(&self, x: f64) -> f64 {
        gumbel_cdf(x, self.location, self.scale)
    }

    /// Upper tail `P(X > x)`.
    pub fn survival(&self, x: f64) -> f64 {
        gumbel_survival(x, self.location, self.scale)
    }

    pub fn mean(&self) -> f64 {
        self.location + EULER_GAMMA * self.scale
    }

    pub fn variance(&self) -> f64 {
        PI * PI * self.scale * self.scale / 6.0
    }
}

/// Gumbel CDF.
pub fn gumbel_cdf(x: f64, location: f64, scale: f64) -> f64 {
    if x.is_nan() || location.is_nan() || scale.is_nan() || scale <= 0.0 {
        return f64::NAN;
    }
    let z = (x - location) / scale;
    (-(-z).exp()).exp()
}

/// Gumbel upper tail, computed as `−expm1(−exp(−z))` to keep precision
/// for large `x`.
pub fn gumbel_survival(x: f64, location: f64, scale: f64) -> f64 {
    if x.is_nan() || location.is_nan() || scale.is_nan() || scale <= 0.0 {
        return f64::NAN;
    }
    let z = (x - location) / scale;
    -(-(-z).exp()).exp_m1()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn cdf_at_location() {
        // F(location) = exp(-1)
        assert!(approx_eq(gumbel_cdf(2.0, 2.0, 0.5), (-1.0f64).exp(), 1e-12));
    }

    #[test]
    fn cdf_plus_survival_is_one() {
        for x in [-3.0, -0.5, 0.0, 1.0, 4.0] {
            let total = gumbel_cdf(x, 0.3, 1.2) + gumbel_survival(x, 0.3, 1.2);
            assert!(approx_eq(total, 1.0, 1e-12));
        }
    }

    #[test]
    fn survival_stays_positive_far_in_tail() {
        let s = gumbel_survival(60.0, 0.0, 1.0);
        assert!(s > 0.0);
        assert!(approx_eq(s.ln(), -60.0, 1e-6));
    }

    #[test]
    fn fit_matches_moments() {
        let sample = [1.0, 2.0, 3.0, 4.0, 5.0];
        let fit = GumbelParams::fit_moments(&sample).unwrap();
        assert!(approx_eq(fit.mean(), 3.0, 1e-12));
        assert!(approx_eq(fit.variance(), 2.5, 1e-12));
    }

    #[test]
    fn fit_rejects_degenerate_samples() {
        assert!(GumbelParams::fit_moments(&[]).is_none());
        assert!(GumbelParams::fit_moments(&[1.0]).is_none());
        assert!(GumbelParams::fit_moments(&[2.0, 2.0, 2.0]).is_none());
        assert!(GumbelParams::fit_moments(&[f64::NAN, 1.0]).is_none());
    }

    #[test]
    fn invalid_scale_is_nan() {
        assert!(gumbel_cdf(0.0, 0.0, 0.0).is_nan());
        assert!(gumbel_survival(0.0, 0.0, -1.0).is_nan());
    }
}
