use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::Transactional;

use crate::catalog::WordEntry;
use crate::rating::elo::{update_ratings, RatingUpdate};
use crate::rating::{UserRatingState, WordRatingState};
use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub id: String,
    pub user_id: String,
    pub word: String,
    pub success: bool,
    #[serde(default)]
    pub transcript: Option<String>,
    pub user_rating_before: f64,
    pub user_rating_after: f64,
    pub word_rating_before: f64,
    pub word_rating_after: f64,
    pub created_at: DateTime<Utc>,
}

/// Everything one attempt changed, as committed.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub update: RatingUpdate,
    pub user: UserRatingState,
    pub word: WordRatingState,
    pub record: AttemptRecord,
}

#[derive(Debug, Clone)]
pub struct NewAttempt<'a> {
    pub user_id: &'a str,
    pub word: &'a str,
    pub success: bool,
    pub transcript: Option<&'a str>,
    /// Used to seed the word's state when it has none yet.
    pub catalog_entry: Option<&'a WordEntry>,
    pub recent_words_limit: usize,
}

impl Store {
    /// 在单个事务中完成一次尝试：读取双方评分、计算 Elo、更新计数与最近单词、写入历史记录。
    ///
    /// 同一单词的并发尝试由 sled 事务冲突重试串行化，不会丢失更新。
    pub fn record_attempt(&self, attempt: NewAttempt<'_>) -> Result<AttemptOutcome, StoreError> {
        let user_key = keys::user_rating_key(attempt.user_id)?;
        let word_key = keys::word_rating_key(attempt.word)?;

        let id = uuid::Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let attempt_key = keys::attempt_key(attempt.user_id, created_at.timestamp_millis(), &id)?;

        let outcome = (&self.user_ratings, &self.word_ratings, &self.attempts)
            .transaction(|(tx_users, tx_words, tx_attempts)| {
                let mut user = match tx_users.get(user_key.as_bytes())? {
                    Some(raw) => Self::deserialize::<UserRatingState>(&raw)
                        .map_err(ConflictableTransactionError::Abort)?,
                    None => UserRatingState::default(),
                };

                let mut word = match (tx_words.get(word_key.as_bytes())?, attempt.catalog_entry) {
                    (Some(raw), _) => Self::deserialize::<WordRatingState>(&raw)
                        .map_err(ConflictableTransactionError::Abort)?,
                    (None, Some(entry)) => entry.seed_state(),
                    (None, None) => {
                        return Err(ConflictableTransactionError::Abort(StoreError::NotFound {
                            entity: "word".to_string(),
                            key: attempt.word.to_string(),
                        }))
                    }
                };

                let user_rating_before = user.rating;
                let word_rating_before = word.rating;
                let update = update_ratings(user_rating_before, word_rating_before, attempt.success);

                user.record_attempt(
                    &word.word,
                    attempt.success,
                    update.new_user_rating,
                    attempt.recent_words_limit,
                );
                word.record_attempt(attempt.success, update.new_word_rating);

                let record = AttemptRecord {
                    id: id.clone(),
                    user_id: attempt.user_id.to_string(),
                    word: word.word.clone(),
                    success: attempt.success,
                    transcript: attempt.transcript.map(str::to_string),
                    user_rating_before,
                    user_rating_after: update.new_user_rating,
                    word_rating_before,
                    word_rating_after: update.new_word_rating,
                    created_at,
                };

                let user_bytes = Self::serialize(&user).map_err(ConflictableTransactionError::Abort)?;
                let word_bytes = Self::serialize(&word).map_err(ConflictableTransactionError::Abort)?;
                let record_bytes =
                    Self::serialize(&record).map_err(ConflictableTransactionError::Abort)?;

                tx_users.insert(user_key.as_bytes(), user_bytes)?;
                tx_words.insert(word_key.as_bytes(), word_bytes)?;
                tx_attempts.insert(attempt_key.as_bytes(), record_bytes)?;

                Ok(AttemptOutcome {
                    update,
                    user,
                    word,
                    record,
                })
            })
            .map_err(|error: TransactionError<StoreError>| match error {
                TransactionError::Abort(store_error) => store_error,
                TransactionError::Storage(storage_error) => StoreError::Sled(storage_error),
            })?;

        Ok(outcome)
    }

    /// 用户最近的尝试记录，按时间倒序
    pub fn list_attempts(&self, user_id: &str, limit: usize) -> Result<Vec<AttemptRecord>, StoreError> {
        let prefix = keys::attempt_prefix(user_id)?;
        let mut records = Vec::new();
        for item in self.attempts.scan_prefix(prefix.as_bytes()).take(limit) {
            let (_, value) = item?;
            records.push(Self::deserialize::<AttemptRecord>(&value)?);
        }
        Ok(records)
    }

    pub fn count_attempts(&self, user_id: &str) -> Result<usize, StoreError> {
        let prefix = keys::attempt_prefix(user_id)?;
        let mut count = 0;
        for item in self.attempts.scan_prefix(prefix.as_bytes()) {
            item?;
            count += 1;
        }
        Ok(count)
    }
}
