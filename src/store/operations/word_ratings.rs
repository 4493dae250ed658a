use crate::catalog::{Catalog, WordEntry};
use crate::rating::WordRatingState;
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    pub fn get_word_rating(&self, word: &str) -> Result<Option<WordRatingState>, StoreError> {
        let key = keys::word_rating_key(word)?;
        match self.word_ratings.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_word_rating(&self, state: &WordRatingState) -> Result<(), StoreError> {
        let key = keys::word_rating_key(&state.word)?;
        self.word_ratings
            .insert(key.as_bytes(), Self::serialize(state)?)?;
        Ok(())
    }

    /// 仅在单词评分不存在时写入种子状态（幂等），返回当前存储的状态
    pub fn seed_word_rating(&self, entry: &WordEntry) -> Result<WordRatingState, StoreError> {
        let key = keys::word_rating_key(&entry.word)?;
        let seeded = entry.seed_state();
        let cas_result = self.word_ratings.compare_and_swap(
            key.as_bytes(),
            None::<&[u8]>,
            Some(Self::serialize(&seeded)?),
        )?;

        match cas_result {
            Ok(()) => {
                tracing::debug!(word = %entry.word, rating = seeded.rating, "Seeded word rating");
                Ok(seeded)
            }
            Err(existing) => match existing.current {
                Some(raw) => Self::deserialize(&raw),
                None => Ok(seeded),
            },
        }
    }

    /// Seed every catalog word that has no stored state yet. Returns how many were added.
    pub fn seed_catalog(&self, catalog: &Catalog) -> Result<usize, StoreError> {
        let mut seeded = 0;
        for entry in catalog.entries() {
            let key = keys::word_rating_key(&entry.word)?;
            if self.word_ratings.contains_key(key.as_bytes())? {
                continue;
            }
            self.seed_word_rating(entry)?;
            seeded += 1;
        }
        Ok(seeded)
    }

    pub fn list_word_ratings(&self) -> Result<Vec<WordRatingState>, StoreError> {
        let mut states = Vec::new();
        for item in self.word_ratings.iter() {
            let (_, value) = item?;
            states.push(Self::deserialize::<WordRatingState>(&value)?);
        }
        Ok(states)
    }

    /// Catalog merged with stored state, sorted by word. Stored state wins;
    /// catalog words without state are seeded on the way.
    pub fn catalog_word_ratings(&self, catalog: &Catalog) -> Result<Vec<WordRatingState>, StoreError> {
        let seeded = self.seed_catalog(catalog)?;
        if seeded > 0 {
            tracing::info!(seeded, "Seeded missing catalog words");
        }

        let mut states = self.list_word_ratings()?;
        states.sort_by(|a, b| a.word.cmp(&b.word));
        Ok(states)
    }
}
