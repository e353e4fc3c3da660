//! Geocoding provider configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration shared by the geocoding provider clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Base URL of the swisstopo GeoAdmin REST API
    #[serde(default = "default_swisstopo_base_url")]
    pub swisstopo_base_url: String,

    /// Base URL of the Nominatim API
    #[serde(default = "default_nominatim_base_url")]
    pub nominatim_base_url: String,

    /// Base URL of the Overpass API
    #[serde(default = "default_overpass_base_url")]
    pub overpass_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request (Nominatim rejects anonymous clients)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Country code filter for the generic provider (empty for none)
    #[serde(default = "default_country_filter")]
    pub country_filter: String,

    /// Maximum number of geocoding results per request
    #[serde(default = "default_result_limit")]
    pub result_limit: u8,

    /// Maximum number of points of interest per request
    #[serde(default = "default_poi_limit")]
    pub poi_limit: u16,

    /// Cache TTL in minutes for forward geocoding results (0 to disable)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u32,

    /// Minimum spacing between Nominatim requests in milliseconds
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
}

fn default_swisstopo_base_url() -> String {
    "https://api3.geo.admin.ch/rest/services/api".to_string()
}

fn default_nominatim_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_overpass_base_url() -> String {
    "https://overpass-api.de/api".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("climbing-geo/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_country_filter() -> String {
    "ch".to_string()
}

const fn default_result_limit() -> u8 {
    5
}

const fn default_poi_limit() -> u16 {
    25
}

const fn default_cache_ttl_minutes() -> u32 {
    60
}

const fn default_min_request_interval_ms() -> u64 {
    1100
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            swisstopo_base_url: default_swisstopo_base_url(),
            nominatim_base_url: default_nominatim_base_url(),
            overpass_base_url: default_overpass_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            country_filter: default_country_filter(),
            result_limit: default_result_limit(),
            poi_limit: default_poi_limit(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
            min_request_interval_ms: default_min_request_interval_ms(),
        }
    }
}

impl GeocodingConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            cache_ttl_minutes: 0,
            min_request_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Point every provider at one base URL (mock servers)
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.swisstopo_base_url = base_url.to_string();
        self.nominatim_base_url = base_url.to_string();
        self.overpass_base_url = base_url.to_string();
        self
    }

    /// Request timeout as a [`Duration`]
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_minutes > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        for (name, url) in [
            ("swisstopo_base_url", &self.swisstopo_base_url),
            ("nominatim_base_url", &self.nominatim_base_url),
            ("overpass_base_url", &self.overpass_base_url),
        ] {
            if url.is_empty() {
                return Err(format!("{name} must not be empty"));
            }
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        if self.result_limit == 0 || self.result_limit > 50 {
            return Err("result_limit must be between 1 and 50".to_string());
        }

        if self.poi_limit == 0 {
            return Err("poi_limit must be greater than 0".to_string());
        }

        Ok(())
    }
}
