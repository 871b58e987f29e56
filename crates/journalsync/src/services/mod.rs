//! Application services built on top of the storage and cache backends.

mod accounts;
mod config_cache;
mod journal;
mod mail;
mod sentiment;
mod weather;

pub use accounts::{AccountService, SendMailError};
pub use config_cache::ConfigCache;
pub use journal::JournalService;
pub use mail::{LogMailer, MailError, Mailer};
pub use sentiment::{DigestReport, SentimentDigestJob};
pub use weather::{HttpWeatherProvider, WeatherProvider, WeatherService};

#[cfg(test)]
pub use weather::{CurrentConditions, LookupError, WeatherResponse};
