use serde::{Deserialize, Serialize};

use super::DEFAULT_RATING;

/// Per-user rating state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRatingState {
    pub rating: f64,
    pub total_attempts: u32,
    pub successful_attempts: u32,
    /// Most recent first, used only to avoid immediate repeats.
    #[serde(default)]
    pub recent_words: Vec<String>,
}

impl Default for UserRatingState {
    fn default() -> Self {
        Self {
            rating: DEFAULT_RATING,
            total_attempts: 0,
            successful_attempts: 0,
            recent_words: Vec::new(),
        }
    }
}

impl UserRatingState {
    /// Apply the outcome of one attempt: new rating, counters and recency list.
    pub fn record_attempt(&mut self, word: &str, success: bool, new_rating: f64, recent_limit: usize) {
        self.rating = new_rating;
        self.total_attempts += 1;
        if success {
            self.successful_attempts += 1;
        }

        self.recent_words.retain(|w| w != word);
        self.recent_words.insert(0, word.to_string());
        self.recent_words.truncate(recent_limit);
    }
}

/// Per-word rating state, seeded from the word's category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRatingState {
    pub word: String,
    pub rating: f64,
    pub total_attempts: u32,
    pub successful_attempts: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub base_rating: Option<f64>,
}

impl WordRatingState {
    pub fn new(word: &str, rating: f64) -> Self {
        Self {
            word: word.to_string(),
            rating,
            total_attempts: 0,
            successful_attempts: 0,
            category: None,
            base_rating: None,
        }
    }

    /// Fresh state for a word whose difficulty is only known through its category.
    pub fn seeded(word: &str, category: &str) -> Self {
        let base = super::category::base_rating_for(category);
        Self {
            word: word.to_string(),
            rating: base,
            total_attempts: 0,
            successful_attempts: 0,
            category: Some(category.to_string()),
            base_rating: Some(base),
        }
    }

    pub fn record_attempt(&mut self, success: bool, new_rating: f64) {
        self.rating = new_rating;
        self.total_attempts += 1;
        if success {
            self.successful_attempts += 1;
        }
    }
}
