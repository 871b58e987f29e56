//! Read-through weather lookup.
//!
//! [`WeatherService::get`] serves from the cache store when it can and only
//! calls the provider on a miss. Successful responses are cached for a fixed
//! TTL; failures are never cached, so the next call retries right away.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use journalsync_core::cache::{get_typed, set_typed, weather_key, Cache};
use journalsync_core::lookup::{
    render_template, ConfigError, ConfigKey, PLACEHOLDER_API_KEY, PLACEHOLDER_CITY,
};

use super::ConfigCache;

/// How long a successful lookup stays cached.
pub const WEATHER_TTL: Duration = Duration::from_secs(300);

/// Why a provider call produced no data.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Weather provider returned status {0}")]
    Status(u16),
    #[error("Weather provider unreachable: {0}")]
    Transport(String),
    #[error("Weather provider timed out after {0:?}")]
    Timeout(Duration),
    #[error("Malformed weather response: {0}")]
    Malformed(String),
    #[error("Weather request template unavailable: {0}")]
    Template(#[from] ConfigError),
}

/// Current-conditions payload, as returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(rename = "feelslike")]
    pub feels_like: f64,
    #[serde(default)]
    pub weather_descriptions: Vec<String>,
}

/// Performs the actual external call for a fully rendered request URL.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<WeatherResponse, LookupError>;
}

/// HTTP provider bounded by a request timeout.
pub struct HttpWeatherProvider {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpWeatherProvider {
    pub fn new(timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> LookupError {
        if err.is_timeout() {
            LookupError::Timeout(self.timeout)
        } else if err.is_decode() {
            LookupError::Malformed(err.to_string())
        } else {
            LookupError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl WeatherProvider for HttpWeatherProvider {
    async fn fetch(&self, url: &str) -> Result<WeatherResponse, LookupError> {
        let call = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| self.map_reqwest_error(e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(LookupError::Status(status.as_u16()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| self.map_reqwest_error(e))?;
            serde_json::from_slice(&body).map_err(|e| LookupError::Malformed(e.to_string()))
        };

        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| LookupError::Timeout(self.timeout))?
    }
}

/// Weather lookups memoized in the cache store.
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    cache: Arc<dyn Cache>,
    config: Arc<ConfigCache>,
    api_key: String,
    ttl: Duration,
}

impl WeatherService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        cache: Arc<dyn Cache>,
        config: Arc<ConfigCache>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
            api_key: api_key.into(),
            ttl: WEATHER_TTL,
        }
    }

    /// Overrides the cache TTL.
    #[cfg(test)]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Current weather for `city`, or `None` when no data is available.
    ///
    /// Cache read errors count as a miss. Cache write errors are logged and
    /// the fetched value is still returned.
    pub async fn get(&self, city: &str) -> Option<WeatherResponse> {
        let key = weather_key(city);

        match get_typed::<WeatherResponse, _>(self.cache.as_ref(), &key).await {
            Ok(Some(cached)) => {
                tracing::trace!(key = %key, "Weather cache hit");
                return Some(cached);
            }
            Ok(None) => tracing::trace!(key = %key, "Weather cache miss"),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "Weather cache read failed, treating as miss")
            }
        }

        let response = match self.fetch(city).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(city, error = %err, "Weather lookup failed");
                return None;
            }
        };

        if let Err(err) = set_typed(self.cache.as_ref(), &key, &response, Some(self.ttl)).await {
            tracing::warn!(key = %key, error = %err, "Failed to cache weather response");
        }
        Some(response)
    }

    async fn fetch(&self, city: &str) -> Result<WeatherResponse, LookupError> {
        let template = self.config.get(ConfigKey::WeatherApi.as_str())?;
        let url = render_template(
            &template,
            &[
                (PLACEHOLDER_CITY, city.trim()),
                (PLACEHOLDER_API_KEY, &self.api_key),
            ],
        );
        self.provider.fetch(&url).await
    }

    /// Greeting for `username`, mentioning the weather in `city` when known.
    pub async fn greeting(&self, username: &str, city: &str) -> String {
        let mut greeting = format!("Welcome back, {username}!");
        if let Some(weather) = self.get(city).await {
            greeting.push_str(&format!(
                " Today's weather in {} feels like {}°C.",
                city.trim(),
                weather.current.feels_like
            ));
        }
        greeting
    }
}
