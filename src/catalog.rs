//! Built-in practice word list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::rating::WordRatingState;

const BUILTIN_WORDS: &str = include_str!("../data/words.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    pub definition: String,
    pub sentence: String,
    pub category: String,
}

impl WordEntry {
    /// Fresh rating state at the category's base rating.
    pub fn seed_state(&self) -> WordRatingState {
        WordRatingState::seeded(&self.word, &self.category)
    }
}

/// Ordered word list with exact, case-sensitive lookup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<WordEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, serde_json::Error> {
        let entries: Vec<WordEntry> = serde_json::from_str(BUILTIN_WORDS)?;
        Ok(Self::from_entries(entries))
    }

    /// Later duplicates of a word are dropped; the first entry wins.
    pub fn from_entries(entries: Vec<WordEntry>) -> Self {
        let mut kept = Vec::with_capacity(entries.len());
        let mut index = HashMap::with_capacity(entries.len());

        for entry in entries {
            if index.contains_key(&entry.word) {
                tracing::debug!(word = %entry.word, category = %entry.category, "Duplicate catalog word skipped");
                continue;
            }
            index.insert(entry.word.clone(), kept.len());
            kept.push(entry);
        }

        Self {
            entries: kept,
            index,
        }
    }

    pub fn get(&self, word: &str) -> Option<&WordEntry> {
        self.index.get(word).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::category::is_known_category;

    fn entry(word: &str, category: &str) -> WordEntry {
        WordEntry {
            word: word.to_string(),
            definition: String::new(),
            sentence: String::new(),
            category: category.to_string(),
        }
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.len() > 100);
        assert!(catalog.contains("colonel"));
        assert!(!catalog.contains("Colonel"));
    }

    #[test]
    fn builtin_categories_are_all_rated() {
        let catalog = Catalog::builtin().unwrap();
        for entry in catalog.entries() {
            assert!(
                is_known_category(&entry.category),
                "unexpected category {} for {}",
                entry.category,
                entry.word
            );
        }
    }

    #[test]
    fn first_duplicate_wins() {
        let catalog = Catalog::from_entries(vec![
            entry("ghost", "First Grade"),
            entry("rizz", "Bonus: Slang Words"),
            entry("ghost", "Bonus: Slang Words"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("ghost").unwrap().category, "First Grade");
    }

    #[test]
    fn seed_state_uses_category_base() {
        let state = entry("sesquipedalian", "SAT Style").seed_state();
        assert_eq!(state.rating, 1800.0);
        assert_eq!(state.total_attempts, 0);
    }
}
