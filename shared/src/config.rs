use std::time::Duration;
use tracing::warn;

pub struct Config {
    pub data_dir: String,
    pub today_cache_ttl: Duration,
    pub default_cache_ttl: Duration,
    pub fetch_timeout: Duration,
}

impl Config {
    const DEFAULT_DATA_DIR: &str = "./data";
    const DEFAULT_TODAY_CACHE_TTL_SECS: u64 = 5 * 60;
    const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
    const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("MENSA_DATA_DIR")
                .unwrap_or_else(|_| Self::DEFAULT_DATA_DIR.to_string()),
            today_cache_ttl: Duration::from_secs(env_secs(
                "MENSA_TODAY_CACHE_TTL_SECS",
                Self::DEFAULT_TODAY_CACHE_TTL_SECS,
            )),
            default_cache_ttl: Duration::from_secs(env_secs(
                "MENSA_CACHE_TTL_SECS",
                Self::DEFAULT_CACHE_TTL_SECS,
            )),
            fetch_timeout: Duration::from_secs(env_secs(
                "MENSA_FETCH_TIMEOUT_SECS",
                Self::DEFAULT_FETCH_TIMEOUT_SECS,
            )),
        }
    }
}

fn env_secs(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{key}={raw} is not a number of seconds, using {default}");
            default
        }),
        Err(_) => default,
    }
}
