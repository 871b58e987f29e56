/// Prefix shared by every cached weather lookup.
pub const WEATHER_KEY_PREFIX: &str = "weather_of_";

/// Normalizes a lookup subject before it becomes part of a cache key.
///
/// Leading/trailing whitespace is dropped, inner runs of whitespace collapse
/// to one space and the result is lowercased, so `" New  York"` and
/// `"new york"` share a cache entry.
pub fn normalize_subject(subject: &str) -> String {
    subject
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Returns the cache key for a weather lookup of `city`.
pub fn weather_key(city: &str) -> String {
    format!("{}{}", WEATHER_KEY_PREFIX, normalize_subject(city))
}
