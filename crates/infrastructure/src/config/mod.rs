//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `catalog`: catalogue snapshot location and cache
//! - `search`: unified search tunables
//!
//! Geocoding provider settings are owned by `integration_geocoding`.
//!
//! Sources are layered: built-in defaults, then an optional `config.toml`,
//! then environment variables such as `CLIMBGEO_SERVER__PORT=8080` or
//! `CLIMBGEO_GEOCODING__TIMEOUT_SECS=5`.

mod catalog;
mod search;
mod server;

use integration_geocoding::GeocodingConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use catalog::CatalogConfig;
pub use search::SearchAppConfig;
pub use server::ServerConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CLIMBGEO";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Geocoding providers
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Catalogue snapshot
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Unified search
    #[serde(default)]
    pub search: SearchAppConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the file `name` (any extension the `config`
    /// crate understands, optional) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be parsed.
    pub fn load_from(name: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.log_format", "text")?
            // Load from file if exists
            .add_source(config::File::with_name(name).required(false))
            // Override with environment variables (e.g., CLIMBGEO_SERVER__PORT)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::for_testing(),
            geocoding: GeocodingConfig::for_testing(),
            catalog: CatalogConfig::for_testing(),
            search: SearchAppConfig::for_testing(),
        }
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.geocoding
            .validate()
            .map_err(|e| format!("geocoding: {e}"))?;
        self.catalog.validate()?;
        self.search.validate()?;

        if self.search.branch_timeout_ms >= self.geocoding.timeout_secs.saturating_mul(1000) {
            warn!(
                branch_timeout_ms = self.search.branch_timeout_ms,
                geocoder_timeout_secs = self.geocoding.timeout_secs,
                "Search branch timeout is not shorter than the geocoder timeout"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.geocoding.country_filter, "ch");
        assert_eq!(config.search.max_limit, 200);
    }

    #[test]
    fn testing_config_is_valid() {
        let config = AppConfig::for_testing();
        assert!(config.validate().is_ok());
        assert!(!config.geocoding.caching_enabled());
        assert!(config.catalog.cache_ttl().is_none());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_from("/nonexistent/climbgeo-config").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.search.default_limit, 20);
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 8081\nlog_format = \"json\"\n\n\
             [geocoding]\ntimeout_secs = 4\n\n\
             [catalog]\npath = \"/srv/catalog.json\"\n\n\
             [search]\ndefault_radius_km = 10.0"
        )
        .unwrap();

        let name = dir.path().join("config");
        let config = AppConfig::load_from(name.to_str().unwrap()).unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.log_format, "json");
        assert_eq!(config.geocoding.timeout_secs, 4);
        assert_eq!(config.catalog.path.to_str(), Some("/srv/catalog.json"));
        assert!((config.search.default_radius_km - 10.0).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_geocoding_section_is_reported() {
        let mut config = AppConfig::default();
        config.geocoding.timeout_secs = 0;
        assert!(config.validate().unwrap_err().starts_with("geocoding:"));
    }
}
