//! Null-model count sampler.
//!
//! Negative binomial draws are realised as a Gamma–Poisson mixture:
//! `λ ~ Gamma(shape = ω, scale = μ/ω)`, then `y ~ Poisson(λ)`. Infinite
//! overdispersion skips the Gamma step. Degenerate parameters draw 0.

use ebscan_math::NegBinParams;
use rand::Rng;
use rand_distr::{Distribution, Gamma, Poisson};

/// Draw one count from the negative binomial null of a cell.
pub fn draw_negbin<R: Rng + ?Sized>(params: NegBinParams, rng: &mut R) -> u64 {
    let mu = params.mean;
    if mu.is_nan() || mu <= 0.0 {
        return 0;
    }
    if params.is_poisson() {
        return draw_poisson(mu, rng);
    }

    let omega = params.overdispersion;
    if omega.is_nan() || omega <= 0.0 {
        return 0;
    }
    let lambda = match Gamma::new(params.gamma_shape(), params.gamma_scale()) {
        Ok(gamma) => gamma.sample(rng),
        Err(_) => return 0,
    };
    draw_poisson(lambda, rng)
}

/// Draw one count from `Poisson(lambda)`.
pub fn draw_poisson<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> u64 {
    if lambda.is_nan() || lambda <= 0.0 {
        return 0;
    }
    match Poisson::new(lambda) {
        Ok(poisson) => {
            let y: f64 = poisson.sample(rng);
            y as u64
        }
        // beyond the sampler's range the mean is as good as any draw
        Err(_) => lambda as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_moments(params: NegBinParams, n: usize, seed: u64) -> (f64, f64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let xs: Vec<f64> = (0..n).map(|_| draw_negbin(params, &mut rng) as f64).collect();
        let mean = xs.iter().sum::<f64>() / n as f64;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n as f64 - 1.0);
        (mean, var)
    }

    #[test]
    fn degenerate_parameters_draw_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(draw_negbin(NegBinParams::new(0.0, 2.0), &mut rng), 0);
        assert_eq!(draw_negbin(NegBinParams::new(-1.0, 2.0), &mut rng), 0);
        assert_eq!(draw_negbin(NegBinParams::new(f64::NAN, 2.0), &mut rng), 0);
        assert_eq!(draw_negbin(NegBinParams::new(3.0, 0.0), &mut rng), 0);
        assert_eq!(draw_negbin(NegBinParams::new(3.0, f64::NAN), &mut rng), 0);
        assert_eq!(draw_poisson(0.0, &mut rng), 0);
    }

    #[test]
    fn negbin_moments_match() {
        // mean 5, variance 5 + 25/2 = 17.5
        let (mean, var) = sample_moments(NegBinParams::new(5.0, 2.0), 40_000, 7);
        assert!((mean - 5.0).abs() < 0.15, "mean = {}", mean);
        assert!((var - 17.5).abs() < 1.5, "var = {}", var);
    }

    #[test]
    fn infinite_overdispersion_is_poisson() {
        let (mean, var) = sample_moments(NegBinParams::new(4.0, f64::INFINITY), 40_000, 9);
        assert!((mean - 4.0).abs() < 0.1, "mean = {}", mean);
        assert!((var - 4.0).abs() < 0.3, "var = {}", var);
    }

    #[test]
    fn seeded_draws_repeat() {
        let params = NegBinParams::new(3.0, 1.5);
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            assert_eq!(draw_negbin(params, &mut a), draw_negbin(params, &mut b));
        }
    }
}
