pub const USER_PROFILES: &str = "user_profiles";
pub const USER_RATINGS: &str = "user_ratings";
pub const WORD_RATINGS: &str = "word_ratings";
pub const ATTEMPTS: &str = "attempts";
pub const CUTOFF_SNAPSHOTS: &str = "cutoff_snapshots";
pub const CONFIG_VERSIONS: &str = "config_versions";
