use pronounce_backend::catalog::{Catalog, WordEntry};
use pronounce_backend::rating::UserRatingState;
use pronounce_backend::store::Store;

pub fn entry(word: &str, category: &str) -> WordEntry {
    WordEntry {
        word: word.to_string(),
        definition: format!("definition of {word}"),
        sentence: format!("A sentence with {word}."),
        category: category.to_string(),
    }
}

/// 三个难度不同的单词：1200 / 1500 / 1800
pub fn small_catalog() -> Catalog {
    Catalog::from_entries(vec![
        entry("cat", "First Grade"),
        entry("ocean", "Fifth Grade"),
        entry("ubiquitous", "SAT Style"),
    ])
}

/// 写入若干已练习过的用户，评分从 `start` 开始每人递增 `step`
pub fn seed_rated_users(store: &Store, count: usize, start: f64, step: f64) {
    for i in 0..count {
        let state = UserRatingState {
            rating: start + i as f64 * step,
            total_attempts: 1,
            successful_attempts: 1,
            recent_words: Vec::new(),
        };
        store
            .set_user_rating(&format!("seed-{i}"), &state)
            .expect("seed user rating");
    }
}
