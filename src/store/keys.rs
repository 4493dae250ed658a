use crate::store::StoreError;

const MAX_KEY_SEGMENT_BYTES: usize = 256;

/// 校验 key 片段：非空、长度受限、不含冒号和控制字符（冒号是复合 key 的分隔符）
fn validate_segment(kind: &str, value: &str) -> Result<(), StoreError> {
    if value.is_empty() {
        return Err(StoreError::Validation(format!("{kind} must not be empty")));
    }
    if value.len() > MAX_KEY_SEGMENT_BYTES {
        return Err(StoreError::Validation(format!("{kind} is too long")));
    }
    if value.contains(':') || value.chars().any(char::is_control) {
        return Err(StoreError::Validation(format!(
            "{kind} contains invalid characters"
        )));
    }
    Ok(())
}

pub fn user_rating_key(user_id: &str) -> Result<String, StoreError> {
    validate_segment("user id", user_id)?;
    Ok(user_id.to_string())
}

pub fn user_profile_key(user_id: &str) -> Result<String, StoreError> {
    validate_segment("user id", user_id)?;
    Ok(user_id.to_string())
}

/// Words are single-segment keys, so they may contain anything but control characters.
pub fn word_rating_key(word: &str) -> Result<String, StoreError> {
    if word.is_empty() || word.chars().any(char::is_control) {
        return Err(StoreError::Validation("invalid word key".to_string()));
    }
    Ok(word.to_string())
}

/// Newest first within a user's prefix.
pub fn attempt_key(user_id: &str, timestamp_ms: i64, attempt_id: &str) -> Result<String, StoreError> {
    validate_segment("user id", user_id)?;
    let ts = timestamp_ms.max(0) as u64;
    let reverse_ts = u64::MAX - ts;
    Ok(format!("{}:{:020}:{}", user_id, reverse_ts, attempt_id))
}

pub fn attempt_prefix(user_id: &str) -> Result<String, StoreError> {
    validate_segment("user id", user_id)?;
    Ok(format!("{}:", user_id))
}

/// Zero-padded so that lexicographic order equals numeric order.
pub fn cutoff_snapshot_key(version: u64) -> String {
    format!("v:{:020}", version)
}

pub const CUTOFF_SNAPSHOT_PREFIX: &str = "v:";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_key_orders_by_time_desc() {
        let k_new = attempt_key("u1", 2000, "a2").unwrap();
        let k_old = attempt_key("u1", 1000, "a1").unwrap();
        assert!(k_new < k_old);
        assert!(k_new.starts_with(&attempt_prefix("u1").unwrap()));
    }

    #[test]
    fn user_ids_with_separator_are_rejected() {
        assert!(matches!(
            user_rating_key("a:b"),
            Err(StoreError::Validation(_))
        ));
        assert!(user_rating_key("").is_err());
        assert!(attempt_prefix("u\n1").is_err());
    }

    #[test]
    fn words_may_contain_spaces_and_colons() {
        assert_eq!(word_rating_key("hors d'oeuvre").unwrap(), "hors d'oeuvre");
        assert!(word_rating_key("a:b").is_ok());
        assert!(word_rating_key("").is_err());
    }

    #[test]
    fn snapshot_keys_sort_numerically() {
        assert!(cutoff_snapshot_key(9) < cutoff_snapshot_key(10));
    }
}
