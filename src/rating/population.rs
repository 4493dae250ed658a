//! Population statistics over the ratings of users who have practised at least once.

use super::percentile::PercentileCutoffs;

/// Quantile levels behind each field of [`PercentileCutoffs`].
pub const CUTOFF_QUANTILES: [f64; 6] = [0.10, 0.25, 0.45, 0.65, 0.80, 0.93];

/// Snapshot of population ratings, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    sorted: Vec<f64>,
}

impl Population {
    /// Non-finite ratings are ignored.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted: Vec<f64> = ratings.into_iter().filter(|r| r.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        Self { sorted }
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Percent rank of `rating`: the share of the other members rated strictly lower.
    ///
    /// `None` with fewer than two members.
    pub fn percent_rank(&self, rating: f64) -> Option<f64> {
        let n = self.sorted.len();
        if n < 2 {
            return None;
        }
        let below = self.sorted.partition_point(|r| *r < rating);
        Some((below as f64 / (n - 1) as f64).clamp(0.0, 1.0))
    }

    /// Linearly interpolated quantile, `q` in `[0, 1]`.
    pub fn quantile(&self, q: f64) -> Option<f64> {
        let n = self.sorted.len();
        if n == 0 {
            return None;
        }
        let position = q.clamp(0.0, 1.0) * (n - 1) as f64;
        let lower = position.floor() as usize;
        let upper = position.ceil() as usize;
        let fraction = position - lower as f64;
        Some(self.sorted[lower] + (self.sorted[upper] - self.sorted[lower]) * fraction)
    }

    /// Cutoffs from the population, or `None` when it has fewer than `min_size` members.
    pub fn cutoffs(&self, min_size: usize) -> Option<PercentileCutoffs> {
        if self.sorted.is_empty() || self.sorted.len() < min_size {
            return None;
        }

        let [p10, p25, p45, p65, p80, p93] = CUTOFF_QUANTILES.map(|q| self.quantile(q).unwrap_or(0.0));
        Some(PercentileCutoffs {
            p10,
            p25,
            p45,
            p65,
            p80,
            p93,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn percent_rank_needs_two_members() {
        assert_eq!(Population::default().percent_rank(1500.0), None);
        assert_eq!(Population::from_ratings([1500.0]).percent_rank(1500.0), None);
    }

    #[test]
    fn percent_rank_counts_strictly_lower() {
        let population = Population::from_ratings([1600.0, 1400.0, 1500.0, 1500.0, 1700.0]);
        assert_eq!(population.percent_rank(1400.0), Some(0.0));
        assert_eq!(population.percent_rank(1500.0), Some(0.25));
        assert_eq!(population.percent_rank(1700.0), Some(1.0));
    }

    #[test]
    fn quantile_interpolates() {
        let population = Population::from_ratings([1000.0, 2000.0]);
        assert!(approx(population.quantile(0.25).unwrap(), 1250.0));
        assert_eq!(population.quantile(0.0), Some(1000.0));
        assert_eq!(population.quantile(1.0), Some(2000.0));
    }

    #[test]
    fn cutoffs_require_minimum_population() {
        let population = Population::from_ratings((0..10).map(|i| 1400.0 + i as f64 * 20.0));
        assert!(population.cutoffs(20).is_none());
        let cutoffs = population.cutoffs(10).unwrap();
        assert!(cutoffs.is_ordered());
        // position 0.10 * 9 = 0.9 -> 1400 + 0.9 * 20
        assert!(approx(cutoffs.p10, 1418.0));
    }

    #[test]
    fn non_finite_ratings_are_ignored() {
        let population = Population::from_ratings([f64::NAN, 1500.0, f64::INFINITY]);
        assert_eq!(population.len(), 1);
    }
}
