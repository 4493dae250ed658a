use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let key = keys::user_profile_key(user_id)?;
        match self.user_profiles.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// 更新显示名称，资料不存在时创建
    pub fn set_profile_name(&self, user_id: &str, name: &str) -> Result<UserProfile, StoreError> {
        let key = keys::user_profile_key(user_id)?;
        let now = Utc::now();

        let updated = self
            .user_profiles
            .update_and_fetch(key.as_bytes(), |current| {
                let mut profile = current
                    .and_then(|raw| Self::deserialize::<UserProfile>(raw).ok())
                    .unwrap_or_else(|| UserProfile {
                        user_id: user_id.to_string(),
                        name: None,
                        created_at: now,
                        updated_at: now,
                    });
                profile.name = Some(name.to_string());
                profile.updated_at = now;
                Self::serialize(&profile).ok()
            })?
            .ok_or_else(|| StoreError::Validation("profile could not be serialized".to_string()))?;

        Self::deserialize(&updated)
    }
}
