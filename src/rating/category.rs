//! Category -> base rating table used when a word is first seeded.

/// Base rating for words whose category is not listed.
pub const FALLBACK_BASE_RATING: f64 = 1500.0;

pub const CATEGORY_BASE_RATINGS: &[(&str, f64)] = &[
    ("First Grade", 1200.0),
    ("Third Grade", 1400.0),
    ("Fifth Grade", 1500.0),
    ("Seventh Grade", 1600.0),
    ("Ninth Grade", 1800.0),
    ("SAT Style", 1800.0),
    ("Medical", 1700.0),
    ("Law Enforcement & Legal", 1700.0),
    ("Church & Religious", 1700.0),
    ("Linguistic Curiosities", 1700.0),
    ("Bonus: Slang Words", 1500.0),
];

/// Exact, case-sensitive lookup.
pub fn base_rating_for(category: &str) -> f64 {
    CATEGORY_BASE_RATINGS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, rating)| *rating)
        .unwrap_or(FALLBACK_BASE_RATING)
}

pub fn is_known_category(category: &str) -> bool {
    CATEGORY_BASE_RATINGS.iter().any(|(name, _)| *name == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_map_to_table() {
        assert_eq!(base_rating_for("First Grade"), 1200.0);
        assert_eq!(base_rating_for("Ninth Grade"), 1800.0);
        assert_eq!(base_rating_for("Medical"), 1700.0);
    }

    #[test]
    fn unknown_category_falls_back() {
        assert_eq!(base_rating_for("Klingon"), FALLBACK_BASE_RATING);
        assert_eq!(base_rating_for("first grade"), FALLBACK_BASE_RATING);
        assert!(!is_known_category("first grade"));
    }
}
