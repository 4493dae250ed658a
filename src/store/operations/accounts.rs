use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{IVec, Transactional};

use crate::rating::UserRatingState;
use crate::store::keys;
use crate::store::{Store, StoreError};

/// 并发尝试导致清理冲突时的重试次数
const CLEANUP_RETRIES: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountCleanup {
    pub attempts_removed: usize,
    pub rating_removed: bool,
    pub profile_removed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RatingAction {
    Reset,
    Remove,
}

impl Store {
    /// 清空练习历史并将评分重置为初始状态。单词评分保持不变。
    pub fn reset_user_history(&self, user_id: &str) -> Result<usize, StoreError> {
        let cleanup = self.clear_user_data(user_id, RatingAction::Reset, false)?;
        Ok(cleanup.attempts_removed)
    }

    /// 删除用户的全部数据：尝试记录、评分状态、个人资料。单词评分保持不变。
    pub fn delete_user_data(&self, user_id: &str) -> Result<AccountCleanup, StoreError> {
        self.clear_user_data(user_id, RatingAction::Remove, true)
    }

    /// Attempt keys are collected before the transaction, which cannot scan.
    /// Every attempt rewrites the user's rating state in the same transaction
    /// as its record, so an unchanged rating value means no attempt landed
    /// after the scan. Otherwise the scan is repeated.
    fn clear_user_data(
        &self,
        user_id: &str,
        rating: RatingAction,
        remove_profile: bool,
    ) -> Result<AccountCleanup, StoreError> {
        let rating_key = keys::user_rating_key(user_id)?;
        let profile_key = keys::user_profile_key(user_id)?;
        let prefix = keys::attempt_prefix(user_id)?;
        let fresh_state = Self::serialize(&UserRatingState::default())?;

        for retry in 0..CLEANUP_RETRIES {
            let observed = self.user_ratings.get(rating_key.as_bytes())?;
            let attempt_keys = self
                .attempts
                .scan_prefix(prefix.as_bytes())
                .keys()
                .collect::<Result<Vec<IVec>, _>>()?;

            let result = (&self.attempts, &self.user_ratings, &self.user_profiles).transaction(
                |(tx_attempts, tx_users, tx_profiles)| {
                    if tx_users.get(rating_key.as_bytes())? != observed {
                        return Err(ConflictableTransactionError::Abort(StoreError::Conflict {
                            entity: "user_rating".to_string(),
                            key: user_id.to_string(),
                        }));
                    }

                    for key in &attempt_keys {
                        tx_attempts.remove(key.clone())?;
                    }

                    let rating_removed = match rating {
                        RatingAction::Reset => {
                            tx_users.insert(rating_key.as_bytes(), fresh_state.clone())?;
                            false
                        }
                        RatingAction::Remove => tx_users.remove(rating_key.as_bytes())?.is_some(),
                    };

                    let profile_removed = remove_profile
                        && tx_profiles.remove(profile_key.as_bytes())?.is_some();

                    Ok(AccountCleanup {
                        attempts_removed: attempt_keys.len(),
                        rating_removed,
                        profile_removed,
                    })
                },
            );

            match result {
                Ok(cleanup) => return Ok(cleanup),
                Err(TransactionError::Abort(StoreError::Conflict { .. })) => {
                    tracing::debug!(user_id, retry, "account cleanup raced an attempt, rescanning");
                }
                Err(TransactionError::Abort(store_error)) => return Err(store_error),
                Err(TransactionError::Storage(storage_error)) => {
                    return Err(StoreError::Sled(storage_error))
                }
            }
        }

        Err(StoreError::Conflict {
            entity: "user_rating".to_string(),
            key: user_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::catalog::WordEntry;
    use crate::store::operations::attempts::NewAttempt;
    use crate::store::Store;

    use super::*;

    fn play(store: &Store, user_id: &str, entry: &WordEntry, success: bool) {
        store
            .record_attempt(NewAttempt {
                user_id,
                word: &entry.word,
                success,
                transcript: Some("kernel"),
                catalog_entry: Some(entry),
                recent_words_limit: 10,
            })
            .unwrap();
    }

    fn colonel() -> WordEntry {
        WordEntry {
            word: "colonel".to_string(),
            definition: "A military rank".to_string(),
            sentence: "The colonel led his soldiers into battle.".to_string(),
            category: "Seventh Grade".to_string(),
        }
    }

    #[test]
    fn reset_restores_default_rating_and_keeps_word() {
        let store = Store::temporary().unwrap();
        let word = colonel();
        play(&store, "u1", &word, true);
        play(&store, "u1", &word, true);
        let word_before = store.get_word_rating("colonel").unwrap().unwrap();

        assert_eq!(store.reset_user_history("u1").unwrap(), 2);

        let user = store.get_user_rating("u1").unwrap().unwrap();
        assert_eq!(user.rating, 1500.0);
        assert_eq!(user.total_attempts, 0);
        assert!(user.recent_words.is_empty());
        assert!(store.list_attempts("u1", 10).unwrap().is_empty());
        assert_eq!(store.get_word_rating("colonel").unwrap().unwrap(), word_before);
    }

    #[test]
    fn delete_removes_everything_for_the_user_only() {
        let store = Store::temporary().unwrap();
        let word = colonel();
        play(&store, "u1", &word, false);
        play(&store, "u2", &word, true);
        store.set_profile_name("u1", "Ada").unwrap();

        let cleanup = store.delete_user_data("u1").unwrap();
        assert_eq!(cleanup.attempts_removed, 1);
        assert!(cleanup.rating_removed);
        assert!(cleanup.profile_removed);

        assert!(store.get_user_rating("u1").unwrap().is_none());
        assert!(store.get_profile("u1").unwrap().is_none());
        assert_eq!(store.count_attempts("u2").unwrap(), 1);
        assert_eq!(store.get_word_rating("colonel").unwrap().unwrap().total_attempts, 2);
    }

    #[test]
    fn reset_of_unknown_user_writes_fresh_state() {
        let store = Store::temporary().unwrap();
        assert_eq!(store.reset_user_history("ghost").unwrap(), 0);
        assert_eq!(
            store.get_user_rating("ghost").unwrap(),
            Some(UserRatingState::default())
        );
        assert_eq!(store.delete_user_data("ghost").unwrap(), AccountCleanup {
            attempts_removed: 0,
            rating_removed: true,
            profile_removed: false,
        });
        assert_eq!(store.delete_user_data("ghost").unwrap(), AccountCleanup::default());
    }

    fn assert_history_matches_rating(store: &Store, user_id: &str) {
        let recorded = store.count_attempts(user_id).unwrap();
        let counted = store
            .get_user_rating(user_id)
            .unwrap()
            .map(|state| state.total_attempts)
            .unwrap_or(0);
        assert_eq!(recorded, counted as usize);
    }

    fn cleanup_while_practising(cleanup: impl Fn(&Store) -> Result<(), StoreError>) {
        let store = Arc::new(Store::temporary().unwrap());
        let word = Arc::new(colonel());

        let player = {
            let store = store.clone();
            let word = word.clone();
            std::thread::spawn(move || {
                for i in 0..60 {
                    play(&store, "u1", &word, i % 3 == 0);
                }
            })
        };

        for _ in 0..20 {
            match cleanup(&store) {
                Ok(()) | Err(StoreError::Conflict { .. }) => {}
                Err(other) => panic!("unexpected cleanup error: {other}"),
            }
            std::thread::yield_now();
        }
        player.join().unwrap();

        assert_history_matches_rating(&store, "u1");
    }

    #[test]
    fn reset_never_leaves_attempts_behind_a_fresh_rating() {
        cleanup_while_practising(|store| store.reset_user_history("u1").map(|_| ()));
    }

    #[test]
    fn delete_never_leaves_attempts_behind_a_removed_rating() {
        cleanup_while_practising(|store| store.delete_user_data("u1").map(|_| ()));
    }
}
