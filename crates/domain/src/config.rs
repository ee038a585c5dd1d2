//! Configuration structures

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COLLECTIONS, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_REFRESH_INTERVAL_SECS,
};

/// Process configuration for the registry storage layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Global cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether collections may be cached at all in this process
    pub enabled: bool,
    #[serde(default = "default_refresh_interval")]
    /// Seconds between cache refresh cycles
    pub refresh_interval_seconds: u64,
    #[serde(default = "default_fetch_timeout")]
    /// Upper bound in seconds on one store fetch
    pub fetch_timeout_seconds: u64,
}

impl CacheConfig {
    /// Refresh interval as a [`Duration`]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    /// Fetch timeout as a [`Duration`]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_interval_seconds: DEFAULT_REFRESH_INTERVAL_SECS,
            fetch_timeout_seconds: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

/// Collections the store builds entities for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    pub collections: Vec<CollectionConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collections: DEFAULT_COLLECTIONS
                .iter()
                .map(|(name, prefix, init_size)| CollectionConfig {
                    name: (*name).to_string(),
                    prefix: (*prefix).to_string(),
                    init_size: *init_size,
                })
                .collect(),
        }
    }
}

/// A single named collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Unique collection name
    pub name: String,
    /// Store key prefix holding the collection
    pub prefix: String,
    /// Zero opts the collection out of caching
    #[serde(default)]
    pub init_size: usize,
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

fn default_fetch_timeout() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_cache() {
        let config = Config::default();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.cache.fetch_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_default_collections_include_uncached_schemas() {
        let config = StoreConfig::default();
        let schemas = config.collections.iter().find(|c| c.name == "schemas").unwrap();
        assert_eq!(schemas.init_size, 0);

        let instances = config.collections.iter().find(|c| c.name == "instances").unwrap();
        assert_eq!(instances.prefix, "/cse-sr/inst/files/");
        assert!(instances.init_size > 0);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config: Config = serde_json::from_str(r#"{ "cache": { "enabled": false } }"#).unwrap();
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.refresh_interval_seconds, DEFAULT_REFRESH_INTERVAL_SECS);
        assert_eq!(config.store, StoreConfig::default());
    }
}
