use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use std::fmt;

#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub jwt_secret: String,
    pub cors_origin: String,
    pub trust_proxy: bool,
    pub rate_limit: RateLimitConfig,
    pub worker: WorkerConfig,
    pub practice: PracticeConfig,
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u64,
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub is_leader: bool,
    pub cutoffs_refresh_cron: String,
}

/// Tunables of the rating and selection flow.
#[derive(Debug, Clone)]
pub struct PracticeConfig {
    pub selection_tolerance: f64,
    pub recent_words_limit: usize,
    pub history_limit: usize,
    pub min_population_for_cutoffs: usize,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            selection_tolerance: crate::rating::selector::DEFAULT_TOLERANCE,
            recent_words_limit: crate::constants::MAX_RECENT_WORDS,
            history_limit: crate::constants::MAX_HISTORY_ATTEMPTS,
            min_population_for_cutoffs: crate::constants::MIN_POPULATION_FOR_CUTOFFS,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("enable_file_logs", &self.enable_file_logs)
            .field("log_dir", &self.log_dir)
            .field("sled_path", &self.sled_path)
            .field("jwt_secret", &"***REDACTED***")
            .field("cors_origin", &self.cors_origin)
            .field("trust_proxy", &self.trust_proxy)
            .field("rate_limit", &self.rate_limit)
            .field("worker", &self.worker)
            .field("practice", &self.practice)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = PracticeConfig::default();
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 3000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/pronounce.sled"),
            jwt_secret: env_or(
                "AUTH_JWT_SECRET",
                "change_me_to_random_64_chars_change_me_to_random_64_chars",
            ),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:3001"),
            trust_proxy: env_or_bool("TRUST_PROXY", false),
            rate_limit: RateLimitConfig {
                window_secs: env_or_parse("RATE_LIMIT_WINDOW_SECS", 900_u64),
                max_requests: env_or_parse("RATE_LIMIT_MAX", 500_u64),
            },
            worker: WorkerConfig {
                is_leader: env_or_bool("WORKER_LEADER", true),
                cutoffs_refresh_cron: env_or("CUTOFFS_REFRESH_CRON", "0 */15 * * * *"),
            },
            practice: PracticeConfig {
                selection_tolerance: positive_or_default(
                    "SELECTION_TOLERANCE",
                    env_or_parse("SELECTION_TOLERANCE", defaults.selection_tolerance),
                    defaults.selection_tolerance,
                ),
                recent_words_limit: env_or_parse("RECENT_WORDS_LIMIT", defaults.recent_words_limit),
                history_limit: env_or_parse("HISTORY_LIMIT", defaults.history_limit),
                min_population_for_cutoffs: env_or_parse(
                    "MIN_POPULATION_FOR_CUTOFFS",
                    defaults.min_population_for_cutoffs,
                ),
            },
        }
    }
}

fn positive_or_default(key: &str, value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        tracing::warn!(key, value, "Non-positive value, using default");
        default
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}
