//! Static lookup templates: the keys the configuration cache is expected to
//! hold, the placeholders inside them and the source they are loaded from.

mod error;
mod source;
mod template;

pub use error::{ConfigError, Result};
pub use source::{ConfigSource, StaticConfigSource};
pub use template::{render_template, ConfigKey, PLACEHOLDER_API_KEY, PLACEHOLDER_CITY};
