//! Catalogue snapshot configuration.

use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Where the catalogue snapshot comes from and how long it is cached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to the JSON catalogue snapshot
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,

    /// Snapshot cache TTL in seconds (0 reads the file on every query)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("catalog.json")
}

const fn default_cache_ttl_secs() -> u64 {
    60
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl CatalogConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            cache_ttl_secs: 0,
            ..Default::default()
        }
    }

    /// Snapshot cache TTL, `None` when caching is disabled
    #[must_use]
    pub const fn cache_ttl(&self) -> Option<Duration> {
        if self.cache_ttl_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.cache_ttl_secs))
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.path.as_os_str().is_empty() {
            return Err("catalog.path must not be empty".to_string());
        }
        Ok(())
    }
}
