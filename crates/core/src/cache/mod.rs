mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{normalize_subject, weather_key, WEATHER_KEY_PREFIX};
pub use serialization::{deserialize_value, get_typed, serialize_value, set_typed};
pub use traits::Cache;
