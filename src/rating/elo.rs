//! Paired Elo exchange between a user and a word.

use serde::{Deserialize, Serialize};

/// K-factor for every attempt. Users and words share it so the exchange stays zero-sum.
pub const K_FACTOR: f64 = 32.0;

/// Outcome of a single attempt, ready to be persisted by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingUpdate {
    pub new_user_rating: f64,
    pub new_word_rating: f64,
    pub user_rating_delta: f64,
    pub word_rating_delta: f64,
}

/// Probability that a player rated `rating_a` beats one rated `rating_b`.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((rating_b - rating_a) / 400.0))
}

/// Compute new ratings after one attempt.
///
/// The delta is rounded half away from zero (`f64::round`), so it is always an
/// integer and the word moves by exactly the opposite amount.
pub fn update_ratings(user_rating: f64, word_rating: f64, success: bool) -> RatingUpdate {
    let actual = if success { 1.0 } else { 0.0 };
    let expected = expected_score(user_rating, word_rating);

    let user_rating_delta = (K_FACTOR * (actual - expected)).round();
    let word_rating_delta = -user_rating_delta;

    RatingUpdate {
        new_user_rating: user_rating + user_rating_delta,
        new_word_rating: word_rating + word_rating_delta,
        user_rating_delta,
        word_rating_delta,
    }
}
