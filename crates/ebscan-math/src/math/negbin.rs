//! Negative binomial null model in mean/overdispersion form.
//!
//! # Parameterization
//!
//! A cell's null distribution is given by its baseline `μ` (the mean) and an
//! overdispersion `ω > 0`:
//!
//! - `E[y] = μ`
//! - `Var[y] = μ + μ²/ω`
//!
//! As `ω → ∞` this recovers `Poisson(μ)`. The canonical form used by
//! samplers is `NB(r, p)` counting failures before the `r`-th success with
//! success probability `p`:
//!
//! - `r = ω`
//! - `p = ω / (ω + μ)`
//!
//! Equivalently `y ~ Poisson(λ)` with `λ ~ Gamma(shape = ω, scale = μ/ω)`.

use serde::{Deserialize, Serialize};

/// Mean/overdispersion parameters of one cell's null distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NegBinParams {
    /// Mean (the cell's baseline).
    pub mean: f64,
    /// Overdispersion `ω`; `+inf` means Poisson.
    pub overdispersion: f64,
}

impl NegBinParams {
    pub fn new(mean: f64, overdispersion: f64) -> Self {
        Self {
            mean,
            overdispersion,
        }
    }

    /// True when the distribution degenerates to `Poisson(mean)`.
    pub fn is_poisson(&self) -> bool {
        self.overdispersion == f64::INFINITY
    }

    /// Canonical size parameter `r`.
    pub fn size(&self) -> f64 {
        self.overdispersion
    }

    /// Canonical success probability `p = ω / (ω + μ)`.
    pub fn prob(&self) -> f64 {
        if self.is_poisson() {
            return 1.0;
        }
        self.overdispersion / (self.overdispersion + self.mean)
    }

    /// Variance `μ + μ²/ω`.
    pub fn variance(&self) -> f64 {
        if self.is_poisson() {
            return self.mean;
        }
        self.mean + self.mean * self.mean / self.overdispersion
    }

    /// Shape of the Gamma mixing distribution.
    pub fn gamma_shape(&self) -> f64 {
        self.overdispersion
    }

    /// Scale of the Gamma mixing distribution, `μ/ω`.
    pub fn gamma_scale(&self) -> f64 {
        self.mean / self.overdispersion
    }
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
    fn canonical_conversion() {
        let p = NegBinParams::new(4.0, 2.0);
        assert_eq!(p.size(), 2.0);
        assert!(approx_eq(p.prob(), 2.0 / 6.0, 1e-12));
        assert!(approx_eq(p.variance(), 4.0 + 16.0 / 2.0, 1e-12));
        assert!(approx_eq(p.gamma_scale(), 2.0, 1e-12));
    }

    #[test]
    fn canonical_mean_round_trips() {
        // mean = r (1 - p) / p
        let p = NegBinParams::new(7.5, 0.3);
        let r = p.size();
        let q = p.prob();
        assert!(approx_eq(r * (1.0 - q) / q, 7.5, 1e-9));
    }

    #[test]
    fn infinite_overdispersion_is_poisson() {
        let p = NegBinParams::new(3.0, f64::INFINITY);
        assert!(p.is_poisson());
        assert_eq!(p.variance(), 3.0);
        assert_eq!(p.prob(), 1.0);
    }

    #[test]
    fn large_overdispersion_approaches_poisson() {
        let p = NegBinParams::new(3.0, 1e9);
        assert!(!p.is_poisson());
        assert!(approx_eq(p.variance(), 3.0, 1e-6));
        assert!(approx_eq(p.gamma_shape() * p.gamma_scale(), 3.0, 1e-9));
    }
}
