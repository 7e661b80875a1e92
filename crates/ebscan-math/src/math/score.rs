//! Expectation-based negative binomial scan scores.
//!
//! A window is a zone's locations crossed with the `steps` most recent time
//! periods. Each cell carries its observed count `y`, baseline `μ` and
//! overdispersion `ω`. Both scores are maximum-likelihood estimates of the
//! excess risk inside the window under the negative binomial model
//! `Var[y] = μ + μ²/ω`:
//!
//! - **Hotspot** (risk uniformly elevated over the window):
//!   `Σ (y − μ)/ω / Σ μ/ω`
//! - **Emerging** (risk ramping up towards the present): with `t = 0` the most
//!   recent step and weight `w = steps − t`,
//!   `Σ w(y − μ)/ω / Σ w²μ/ω`
//!
//! `ω = +inf` is the Poisson limit: such cells drop out next to finite ones,
//! and a window made only of them scores `Σ w(y − μ) / Σ w²μ`. Neither
//! function guards `ω > 0`; a non-positive overdispersion produces NaN or
//! ±Inf, which callers pass through unchanged.

/// One space-time cell of a scan window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowCell {
    /// Time offset from the most recent period (0 = most recent).
    pub step: usize,
    /// Observed count.
    pub observed: f64,
    /// Expected count under the null model.
    pub baseline: f64,
    /// Overdispersion parameter (larger is closer to Poisson).
    pub overdispersion: f64,
}

impl WindowCell {
    pub fn new(step: usize, observed: f64, baseline: f64, overdispersion: f64) -> Self {
        Self {
            step,
            observed,
            baseline,
            overdispersion,
        }
    }
}

/// Hotspot score: flat excess-risk estimate over every cell of the window.
///
/// Returns NaN for an empty window.
pub fn hotspot_score<I>(cells: I) -> f64
where
    I: IntoIterator<Item = WindowCell>,
{
    let mut sums = RatioSums::default();
    for cell in cells {
        sums.add(cell, 1.0);
    }
    sums.ratio()
}

/// Emerging score: ramp-weighted excess-risk estimate.
///
/// `steps` is the window duration; a cell at `step = t` gets weight
/// `steps − t`, so the most recent period weighs the most. With `steps = 1`
/// this is exactly [`hotspot_score`].
pub fn emerging_score<I>(cells: I, steps: usize) -> f64
where
    I: IntoIterator<Item = WindowCell>,
{
    let mut sums = RatioSums::default();
    for cell in cells {
        sums.add(cell, steps.saturating_sub(cell.step) as f64);
    }
    sums.ratio()
}

/// Numerator and denominator of a score, split by finite and infinite `ω`.
///
/// Cells with `ω = +inf` carry zero weight next to any finite cell. When
/// every cell is Poisson the `ω` terms cancel and the unweighted sums apply.
#[derive(Debug, Default)]
struct RatioSums {
    num: f64,
    den: f64,
    poisson_num: f64,
    poisson_den: f64,
    any_finite: bool,
}

impl RatioSums {
    fn add(&mut self, cell: WindowCell, w: f64) {
        let excess = w * (cell.observed - cell.baseline);
        let expected = w * w * cell.baseline;
        if cell.overdispersion == f64::INFINITY {
            self.poisson_num += excess;
            self.poisson_den += expected;
        } else {
            self.any_finite = true;
            self.num += excess / cell.overdispersion;
            self.den += expected / cell.overdispersion;
        }
    }

    fn ratio(&self) -> f64 {
        if self.any_finite {
            self.num / self.den
        } else {
            self.poisson_num / self.poisson_den
        }
    }
}
