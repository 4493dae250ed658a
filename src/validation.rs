/// 公共输入验证函数，供练习和用户资料路由共用。
use crate::constants::{MAX_DISPLAY_NAME_CHARS, MAX_TRANSCRIPT_CHARS, MAX_WORD_CHARS};

/// 规范化并验证显示名称：去除首尾空白后 1-100 字符
pub fn normalize_display_name(name: &str) -> Result<String, &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required");
    }
    if trimmed.chars().count() > MAX_DISPLAY_NAME_CHARS {
        return Err("Name must be at most 100 characters");
    }
    Ok(trimmed.to_string())
}

/// 规范化并验证练习单词：去除首尾空白，非空，不含控制字符
pub fn normalize_word(word: &str) -> Result<String, &'static str> {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return Err("Word is required");
    }
    if trimmed.chars().count() > MAX_WORD_CHARS {
        return Err("Word is too long");
    }
    if trimmed.chars().any(char::is_control) {
        return Err("Word contains invalid characters");
    }
    Ok(trimmed.to_string())
}

pub fn validate_transcript(transcript: &str) -> Result<(), &'static str> {
    if transcript.chars().count() > MAX_TRANSCRIPT_CHARS {
        return Err("Transcript is too long");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_trimmed() {
        assert_eq!(normalize_display_name("  Ada  ").unwrap(), "Ada");
    }

    #[test]
    fn blank_display_name_rejected() {
        assert!(normalize_display_name("   ").is_err());
    }

    #[test]
    fn display_name_limit_counts_characters() {
        assert!(normalize_display_name(&"é".repeat(100)).is_ok());
        assert!(normalize_display_name(&"é".repeat(101)).is_err());
    }

    #[test]
    fn word_is_trimmed_and_required() {
        assert_eq!(normalize_word(" colonel ").unwrap(), "colonel");
        assert!(normalize_word("").is_err());
        assert!(normalize_word("a\u{0}b").is_err());
    }

    #[test]
    fn multiword_entries_are_allowed() {
        assert_eq!(normalize_word("hors d'oeuvre").unwrap(), "hors d'oeuvre");
    }

    #[test]
    fn transcript_length_is_bounded() {
        assert!(validate_transcript("kernel").is_ok());
        assert!(validate_transcript(&"a".repeat(501)).is_err());
    }
}
