//! Null models plugged into the scan engine.

use ebscan_common::{Grid, ScoreKind};
use ebscan_math::{emerging_score, hotspot_score, NegBinParams, WindowCell};
use rand::Rng;

use super::sampler::draw_negbin;

/// A space-time window: a zone's locations crossed with the `steps` most
/// recent time periods.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    /// 0-based location ids of the zone.
    pub zone: &'a [usize],
    /// Number of most recent periods covered (duration).
    pub steps: usize,
}

impl<'a> Window<'a> {
    pub fn new(zone: &'a [usize], steps: usize) -> Self {
        Self { zone, steps }
    }

    /// Number of cells in the window.
    pub fn len(&self) -> usize {
        self.zone.len() * self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(row, col)` coordinates, location-major then time.
    pub fn coords(&self) -> impl Iterator<Item = (usize, usize)> + 'a {
        let steps = self.steps;
        self.zone
            .iter()
            .flat_map(move |&loc| (0..steps).map(move |t| (t, loc)))
    }
}

/// What the scan engine needs from a null model.
pub trait ScanModel {
    /// Score one window of `counts`.
    fn score(&self, counts: &Grid<u64>, window: &Window<'_>) -> f64;

    /// Draw a synthetic count for cell `(row, col)` under the null.
    fn draw_sample<R: Rng + ?Sized>(&self, row: usize, col: usize, rng: &mut R) -> u64;
}

/// Expectation-based negative binomial null model.
#[derive(Debug, Clone)]
pub struct EbNegBinModel {
    baselines: Grid<f64>,
    overdispersion: Grid<f64>,
    score_kind: ScoreKind,
}

impl EbNegBinModel {
    /// Baselines and overdispersion must share the count grid's shape.
    pub fn new(baselines: Grid<f64>, overdispersion: Grid<f64>, score_kind: ScoreKind) -> Self {
        debug_assert_eq!(baselines.shape(), overdispersion.shape());
        Self {
            baselines,
            overdispersion,
            score_kind,
        }
    }

    pub fn score_kind(&self) -> ScoreKind {
        self.score_kind
    }

    pub fn baselines(&self) -> &Grid<f64> {
        &self.baselines
    }

    pub fn overdispersion(&self) -> &Grid<f64> {
        &self.overdispersion
    }

    /// Null distribution of one cell.
    pub fn cell_params(&self, row: usize, col: usize) -> NegBinParams {
        NegBinParams::new(self.baselines[(row, col)], self.overdispersion[(row, col)])
    }

    fn cells<'a>(
        &'a self,
        counts: &'a Grid<u64>,
        window: &Window<'a>,
    ) -> impl Iterator<Item = WindowCell> + 'a {
        window.coords().map(move |(t, loc)| {
            WindowCell::new(
                t,
                counts[(t, loc)] as f64,
                self.baselines[(t, loc)],
                self.overdispersion[(t, loc)],
            )
        })
    }
}

impl ScanModel for EbNegBinModel {
    fn score(&self, counts: &Grid<u64>, window: &Window<'_>) -> f64 {
        let cells = self.cells(counts, window);
        match self.score_kind {
            ScoreKind::Hotspot => hotspot_score(cells),
            ScoreKind::Emerging => emerging_score(cells, window.steps),
        }
    }

    fn draw_sample<R: Rng + ?Sized>(&self, row: usize, col: usize, rng: &mut R) -> u64 {
        draw_negbin(self.cell_params(row, col), rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn model(kind: ScoreKind) -> EbNegBinModel {
        EbNegBinModel::new(
            Grid::filled(3, 2, 2.0),
            Grid::filled(3, 2, 1.0),
            kind,
        )
    }

    #[test]
    fn coords_are_location_major() {
        let zone = [1, 0];
        let coords: Vec<_> = Window::new(&zone, 2).coords().collect();
        assert_eq!(coords, vec![(0, 1), (1, 1), (0, 0), (1, 0)]);
        assert_eq!(Window::new(&zone, 2).len(), 4);
    }

    #[test]
    fn hotspot_matches_hand_computation() {
        // y = [4, 2] at loc 0 over two steps, mu = 2, omega = 1:
        // (2 + 0) / (2 + 2) = 0.5
        let counts = Grid::from_rows(vec![vec![4, 0], vec![2, 0], vec![0, 0]]).unwrap();
        let zone = [0];
        let score = model(ScoreKind::Hotspot).score(&counts, &Window::new(&zone, 2));
        assert!((score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn emerging_matches_hand_computation() {
        // weights 2 (t = 0) and 1 (t = 1):
        // num = 2 * 2 + 1 * 0 = 4, den = 4 * 2 + 1 * 2 = 10
        let counts = Grid::from_rows(vec![vec![4, 0], vec![2, 0], vec![0, 0]]).unwrap();
        let zone = [0];
        let score = model(ScoreKind::Emerging).score(&counts, &Window::new(&zone, 2));
        assert!((score - 0.4).abs() < 1e-12);
    }

    #[test]
    fn draws_are_reproducible_with_seed() {
        let m = model(ScoreKind::Hotspot);
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        let xs: Vec<u64> = (0..20).map(|_| m.draw_sample(1, 1, &mut a)).collect();
        let ys: Vec<u64> = (0..20).map(|_| m.draw_sample(1, 1, &mut b)).collect();
        assert_eq!(xs, ys);
    }
}
