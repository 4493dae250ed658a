//! Adaptive next-word selection.
//!
//! Candidates near the user's rating are preferred so the expected success
//! rate stays around 50%. Recency exclusion is soft: when every word was seen
//! recently the whole catalog is used again.

use std::collections::HashSet;

use super::WordRatingState;

/// Default rating distance considered a close match.
pub const DEFAULT_TOLERANCE: f64 = 100.0;

/// Uniform random source in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: rand::Rng + ?Sized> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Pick the next word to practise. Returns `None` only for an empty catalog.
pub fn select_next_word<'a, R>(
    user_rating: f64,
    catalog: &'a [WordRatingState],
    recent_words: &[String],
    tolerance: f64,
    rng: &mut R,
) -> Option<&'a WordRatingState>
where
    R: RandomSource + ?Sized,
{
    if catalog.is_empty() {
        return None;
    }

    let recent: HashSet<&str> = recent_words.iter().map(String::as_str).collect();
    let candidates: Vec<&WordRatingState> = catalog
        .iter()
        .filter(|w| !recent.contains(w.word.as_str()))
        .collect();

    let pool = if candidates.is_empty() {
        catalog.iter().collect()
    } else {
        candidates
    };

    select_from_pool(&pool, user_rating, tolerance, rng)
}

fn select_from_pool<'a, R>(
    pool: &[&'a WordRatingState],
    user_rating: f64,
    tolerance: f64,
    rng: &mut R,
) -> Option<&'a WordRatingState>
where
    R: RandomSource + ?Sized,
{
    let within = |limit: f64| -> Vec<&'a WordRatingState> {
        pool.iter()
            .copied()
            .filter(|w| (w.rating - user_rating).abs() <= limit)
            .collect()
    };

    let mut matches = within(tolerance);
    if matches.is_empty() {
        matches = within(tolerance * 2.0);
    }
    if matches.is_empty() {
        matches = pool.to_vec();
    }

    let weights: Vec<f64> = matches
        .iter()
        .map(|w| (tolerance - (w.rating - user_rating).abs()).max(1.0))
        .collect();
    let total: f64 = weights.iter().sum();

    let mut remaining = rng.next_unit() * total;
    for (candidate, weight) in matches.iter().zip(&weights) {
        remaining -= weight;
        if remaining <= 0.0 {
            return Some(candidate);
        }
    }

    matches.first().copied()
}
