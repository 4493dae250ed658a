use crate::rating::population::Population;
use crate::rating::UserRatingState;
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    pub fn get_user_rating(&self, user_id: &str) -> Result<Option<UserRatingState>, StoreError> {
        let key = keys::user_rating_key(user_id)?;
        match self.user_ratings.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// 获取用户评分状态，不存在时返回默认值（1500，零计数）
    pub fn get_user_rating_or_default(&self, user_id: &str) -> Result<UserRatingState, StoreError> {
        Ok(self.get_user_rating(user_id)?.unwrap_or_default())
    }

    pub fn set_user_rating(&self, user_id: &str, state: &UserRatingState) -> Result<(), StoreError> {
        let key = keys::user_rating_key(user_id)?;
        self.user_ratings
            .insert(key.as_bytes(), Self::serialize(state)?)?;
        Ok(())
    }

    /// 参与人群统计的用户：至少完成过一次尝试
    pub fn rated_population(&self) -> Result<Population, StoreError> {
        let mut ratings = Vec::new();
        for item in self.user_ratings.iter() {
            let (key, value) = item?;
            match Self::deserialize::<UserRatingState>(&value) {
                Ok(state) if state.total_attempts > 0 => ratings.push(state.rating),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        key = %String::from_utf8_lossy(&key),
                        error = %e,
                        "Skipping unreadable user rating"
                    );
                }
            }
        }
        Ok(Population::from_ratings(ratings))
    }
}
