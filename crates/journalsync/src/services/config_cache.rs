//! Process-wide cache of static lookup templates.
//!
//! Contents are replaced wholesale by [`ConfigCache::init`] and are read-only
//! in between. Readers take a cheap snapshot `Arc`, so an `init` running in
//! parallel never exposes a half-built map.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use journalsync_core::lookup::{ConfigError, ConfigSource, Result};

type Snapshot = Arc<HashMap<String, String>>;

pub struct ConfigCache {
    source: Arc<dyn ConfigSource>,
    snapshot: RwLock<Snapshot>,
}

impl ConfigCache {
    /// Creates an empty cache. Nothing is loaded until [`ConfigCache::init`].
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self {
            source,
            snapshot: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    /// Reloads every key from the source, discarding the previous contents.
    ///
    /// On source failure the previous contents stay in place and the error is
    /// returned. Returns the number of keys loaded.
    pub async fn init(&self) -> Result<usize> {
        let loaded: HashMap<String, String> = match self.source.load_config().await {
            Ok(pairs) => pairs.into_iter().collect(),
            Err(err) => {
                tracing::error!(error = %err, "Config reload failed, keeping previous contents");
                return Err(err);
            }
        };

        let count = loaded.len();
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(loaded);
        tracing::info!(keys = count, "Config cache initialized");
        Ok(count)
    }

    /// Returns the template stored under `key`.
    pub fn get(&self, key: &str) -> Result<String> {
        self.current()
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.current().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current().is_empty()
    }

    fn current(&self) -> Snapshot {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use journalsync_core::lookup::StaticConfigSource;

    /// Source whose contents and availability tests can change between loads.
    #[derive(Default)]
    struct SwappableSource {
        pairs: Mutex<Vec<(String, String)>>,
        failing: Mutex<bool>,
    }

    impl SwappableSource {
        fn set(&self, pairs: &[(&str, &str)]) {
            *self.pairs.lock().unwrap() = pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
        }

        fn fail(&self, failing: bool) {
            *self.failing.lock().unwrap() = failing;
        }
    }

    #[async_trait]
    impl ConfigSource for SwappableSource {
        async fn load_config(&self) -> Result<Vec<(String, String)>> {
            if *self.failing.lock().unwrap() {
                return Err(ConfigError::SourceFailed("database offline".to_string()));
            }
            Ok(self.pairs.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn test_get_before_init_is_not_found() {
        let cache = ConfigCache::new(Arc::new(
            StaticConfigSource::new().with_entry("WEATHER_API", "http://x"),
        ));

        assert_eq!(
            cache.get("WEATHER_API"),
            Err(ConfigError::NotFound("WEATHER_API".to_string()))
        );
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_init_loads_every_key() {
        let cache = ConfigCache::new(Arc::new(
            StaticConfigSource::new()
                .with_entry("WEATHER_API", "http://x/<city>")
                .with_entry("OTHER", "y"),
        ));

        assert_eq!(cache.init().await.unwrap(), 2);
        assert_eq!(cache.get("WEATHER_API").unwrap(), "http://x/<city>");
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_reinit_replaces_instead_of_merging() {
        let source = Arc::new(SwappableSource::default());
        source.set(&[("A", "1"), ("B", "2")]);
        let cache = ConfigCache::new(source.clone());
        cache.init().await.unwrap();

        source.set(&[("B", "3")]);
        cache.init().await.unwrap();

        assert!(matches!(cache.get("A"), Err(ConfigError::NotFound(_))));
        assert_eq!(cache.get("B").unwrap(), "3");
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let source = Arc::new(SwappableSource::default());
        source.set(&[("A", "1")]);
        let cache = ConfigCache::new(source);

        cache.init().await.unwrap();
        cache.init().await.unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("A").unwrap(), "1");
    }

    #[tokio::test]
    async fn test_failed_init_keeps_previous_contents() {
        let source = Arc::new(SwappableSource::default());
        source.set(&[("A", "1")]);
        let cache = ConfigCache::new(source.clone());
        cache.init().await.unwrap();

        source.fail(true);
        let result = cache.init().await;

        assert!(matches!(result, Err(ConfigError::SourceFailed(_))));
        assert_eq!(cache.get("A").unwrap(), "1");
    }
}
