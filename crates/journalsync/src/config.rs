use std::{env, str::FromStr, time::Duration};

/// Default weatherstack current-conditions endpoint.
pub const DEFAULT_WEATHER_API_TEMPLATE: &str =
    "http://api.weatherstack.com/current?access_key=<apiKey>&query=<city>";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Per-command timeout for a networked cache store in milliseconds (default: 500)
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub cache_timeout_ms: u64,
    /// Path to SQLite database file (default: "journalsync.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    /// Credential substituted into the weather request template (default: empty)
    pub weather_api_key: String,
    /// Weather request template seeded into the config store
    pub weather_api_template: String,
    /// Weather provider timeout in seconds (default: 5)
    pub weather_timeout_seconds: u64,
    /// Interval between sentiment digest runs in seconds (default: one week)
    pub sentiment_job_interval_seconds: u64,
    /// Sender address for outgoing mail (default: "no-reply@journalsync.local")
    pub mail_from: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `CACHE_TIMEOUT_MS` - Cache command timeout (default: 500)
    /// - `SQLITE_PATH` - SQLite database path (default: "journalsync.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `WEATHER_API_KEY` - Weather provider credential (default: empty)
    /// - `WEATHER_API_TEMPLATE` - Weather request template (default: weatherstack)
    /// - `WEATHER_TIMEOUT_SECONDS` - Weather provider timeout (default: 5)
    /// - `SENTIMENT_JOB_INTERVAL_SECONDS` - Digest interval (default: 604,800)
    /// - `MAIL_FROM` - Sender address (default: "no-reply@journalsync.local")
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
            lookup(key).and_then(|v| v.parse().ok())
        }
        let string = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            cache_max_entries: parsed(&lookup, "CACHE_MAX_ENTRIES").unwrap_or(10_000),
            cache_timeout_ms: parsed(&lookup, "CACHE_TIMEOUT_MS").unwrap_or(500),
            sqlite_path: string("SQLITE_PATH", "journalsync.db"),
            redis_url: string("REDIS_URL", "redis://localhost:6379"),
            weather_api_key: string("WEATHER_API_KEY", ""),
            weather_api_template: string("WEATHER_API_TEMPLATE", DEFAULT_WEATHER_API_TEMPLATE),
            weather_timeout_seconds: parsed(&lookup, "WEATHER_TIMEOUT_SECONDS").unwrap_or(5),
            sentiment_job_interval_seconds: parsed(&lookup, "SENTIMENT_JOB_INTERVAL_SECONDS")
                .unwrap_or(7 * 24 * 60 * 60),
            mail_from: string("MAIL_FROM", "no-reply@journalsync.local"),
        }
    }

    /// Get cache command timeout as a Duration.
    #[allow(dead_code)]
    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }

    /// Get weather provider timeout as a Duration.
    pub fn weather_timeout(&self) -> Duration {
        Duration::from_secs(self.weather_timeout_seconds)
    }

    /// Get sentiment digest interval as a Duration.
    pub fn sentiment_job_interval(&self) -> Duration {
        Duration::from_secs(self.sentiment_job_interval_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.cache_timeout(), Duration::from_millis(500));
        assert_eq!(config.sqlite_path, "journalsync.db");
        assert_eq!(config.redis_url, "redis://localhost:6379");
        assert_eq!(config.weather_api_key, "");
        assert_eq!(config.weather_api_template, DEFAULT_WEATHER_API_TEMPLATE);
        assert_eq!(config.weather_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.sentiment_job_interval(),
            Duration::from_secs(604_800)
        );
        assert_eq!(config.mail_from, "no-reply@journalsync.local");
    }

    #[test]
    fn test_overrides_and_unparsable_values() {
        let vars: HashMap<&str, &str> = [
            ("CACHE_MAX_ENTRIES", "50"),
            ("WEATHER_TIMEOUT_SECONDS", "soon"),
            ("WEATHER_API_KEY", "k3y"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.cache_max_entries, 50);
        assert_eq!(config.weather_timeout_seconds, 5);
        assert_eq!(config.weather_api_key, "k3y");
    }
}
