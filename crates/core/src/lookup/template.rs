/// Placeholder replaced with the URL-encoded city name.
pub const PLACEHOLDER_CITY: &str = "<city>";

/// Placeholder replaced with the URL-encoded API credential.
pub const PLACEHOLDER_API_KEY: &str = "<apiKey>";

/// Well-known keys held by the configuration cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Templated URL of the current-weather endpoint.
    WeatherApi,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::WeatherApi => "WEATHER_API",
        }
    }
}

impl std::fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substitutes every `(placeholder, value)` pair into `template`.
///
/// Values are URL-encoded since templates are URLs.
pub fn render_template(template: &str, substitutions: &[(&str, &str)]) -> String {
    substitutions
        .iter()
        .fold(template.to_string(), |acc, (placeholder, value)| {
            acc.replace(placeholder, &urlencoding::encode(value))
        })
}
