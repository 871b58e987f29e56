use std::collections::HashMap;

use async_trait::async_trait;

use super::Result;

/// Backing source for the configuration cache.
///
/// Every call returns the complete current mapping; the cache replaces its
/// contents with whatever this returns.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn load_config(&self) -> Result<Vec<(String, String)>>;
}

/// Fixed mapping, mostly useful for tests and bootstrapping.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigSource {
    entries: HashMap<String, String>,
}

impl StaticConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

#[async_trait]
impl ConfigSource for StaticConfigSource {
    async fn load_config(&self) -> Result<Vec<(String, String)>> {
        Ok(self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
