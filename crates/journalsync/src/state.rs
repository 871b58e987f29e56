//! Application state.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. Backends are trait objects; which concrete storage and
//! cache store get built is decided at compile time by feature flags.

use std::sync::Arc;

use tokio::sync::broadcast;

use journalsync_core::cache::Cache;
use journalsync_core::lookup::ConfigSource;
use journalsync_core::storage::{AccountRepository, EntryRepository};

use crate::config::Config;
use crate::services::{
    AccountService, ConfigCache, HttpWeatherProvider, JournalService, LogMailer, Mailer,
    SentimentDigestJob, WeatherProvider, WeatherService,
};

/// Concrete storage backend selected by the `sqlite` feature.
#[cfg(feature = "sqlite")]
pub type Storage = crate::storage::SqliteRepository;

/// Concrete storage backend selected by the `sqlite` feature.
#[cfg(not(feature = "sqlite"))]
pub type Storage = crate::storage::InMemoryRepository;

/// Every external collaborator the services are built from.
pub struct Backends {
    pub entries: Arc<dyn EntryRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub config_source: Arc<dyn ConfigSource>,
    pub cache: Arc<dyn Cache>,
    pub weather_provider: Arc<dyn WeatherProvider>,
    pub mailer: Arc<dyn Mailer>,
}

/// Shared application state.
///
/// This is cloned for each request handler.
#[derive(Clone)]
pub struct AppState {
    /// Entry create/delete across both stores.
    pub journal: JournalService,
    /// Account listing for administrators.
    pub accounts: Arc<dyn AccountRepository>,
    /// Sign-up, profile edits and mail sent by users.
    pub users: AccountService,
    pub weather: Arc<WeatherService>,
    pub config_cache: Arc<ConfigCache>,
    /// Cache store, invalidated by the admin reset.
    pub cache: Arc<dyn Cache>,
    pub digest: Arc<SentimentDigestJob>,
    /// Shutdown signal for background tasks.
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    /// Wires the services on top of the given backends.
    pub fn from_backends(backends: Backends, config: &Config) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        let config_cache = Arc::new(ConfigCache::new(backends.config_source));

        let weather = WeatherService::new(
            backends.weather_provider,
            backends.cache.clone(),
            config_cache.clone(),
            config.weather_api_key.clone(),
        );
        let digest = SentimentDigestJob::new(
            backends.accounts.clone(),
            backends.entries.clone(),
            backends.mailer.clone(),
        );
        let users = AccountService::new(backends.accounts.clone(), backends.mailer);

        Self {
            journal: JournalService::new(backends.entries, backends.accounts.clone()),
            accounts: backends.accounts,
            users,
            weather: Arc::new(weather),
            config_cache,
            cache: backends.cache,
            digest: Arc::new(digest),
            shutdown_tx,
        }
    }

    /// Creates AppState over an opened storage backend and cache store, with
    /// the HTTP weather provider and the logging mailer.
    pub fn new(
        storage: Arc<Storage>,
        cache: Arc<dyn Cache>,
        config: &Config,
    ) -> Result<Self, anyhow::Error> {
        let provider = HttpWeatherProvider::new(config.weather_timeout())?;

        Ok(Self::from_backends(
            Backends {
                entries: storage.clone(),
                accounts: storage.clone(),
                config_source: storage,
                cache,
                weather_provider: Arc::new(provider),
                mailer: Arc::new(LogMailer::new(config.mail_from.clone())),
            },
            config,
        ))
    }

    /// Subscribe to shutdown signal.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signal background tasks to shut down.
    pub fn signal_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

// ============================================================================
// Backend factories
// ============================================================================

/// Opens the SQLite database at the configured path.
#[cfg(feature = "sqlite")]
pub async fn open_storage(config: &Config) -> Result<Arc<Storage>, anyhow::Error> {
    let repo = crate::storage::SqliteRepository::new(&config.sqlite_path).await?;
    tracing::info!(path = %config.sqlite_path, "Using SQLite storage");
    Ok(Arc::new(repo))
}

/// Creates an empty in-memory store.
#[cfg(not(feature = "sqlite"))]
pub async fn open_storage(_config: &Config) -> Result<Arc<Storage>, anyhow::Error> {
    tracing::info!("Using in-memory storage");
    Ok(Arc::new(crate::storage::InMemoryRepository::new()))
}

/// Connects to Redis at the configured URL.
#[cfg(feature = "redis")]
pub async fn open_cache(config: &Config) -> Result<Arc<dyn Cache>, anyhow::Error> {
    let cache = crate::cache::RedisCache::new(&config.redis_url, config.cache_timeout()).await?;
    tracing::info!(url = %config.redis_url, "Using Redis cache");
    Ok(Arc::new(cache))
}

/// Creates an in-process LRU cache.
#[cfg(not(feature = "redis"))]
pub async fn open_cache(config: &Config) -> Result<Arc<dyn Cache>, anyhow::Error> {
    let cache = crate::cache::MemoryCache::new(config.cache_max_entries)?;
    tracing::info!(max_entries = config.cache_max_entries, "Using in-memory cache");
    Ok(Arc::new(cache))
}
