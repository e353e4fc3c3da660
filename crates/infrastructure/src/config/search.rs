//! Search aggregation tunables.

use std::time::Duration;

use application::{MAX_PROXIMITY_RESULTS, SearchSettings};
use serde::{Deserialize, Serialize};

/// Configuration of the unified search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchAppConfig {
    /// Per-branch timeout in milliseconds
    #[serde(default = "default_branch_timeout_ms")]
    pub branch_timeout_ms: u64,

    /// Radius used when a request carries an origin but no radius
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,

    /// Per-bucket limit used when a request has none
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Hard cap on any requested limit
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

const fn default_branch_timeout_ms() -> u64 {
    8000
}

const fn default_radius_km() -> f64 {
    25.0
}

const fn default_limit() -> usize {
    20
}

const fn default_max_limit() -> usize {
    MAX_PROXIMITY_RESULTS
}

impl Default for SearchAppConfig {
    fn default() -> Self {
        Self {
            branch_timeout_ms: default_branch_timeout_ms(),
            default_radius_km: default_radius_km(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

impl SearchAppConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            branch_timeout_ms: 2000,
            ..Default::default()
        }
    }

    /// Settings for the search service
    #[must_use]
    pub fn to_settings(&self) -> SearchSettings {
        SearchSettings {
            branch_timeout: Duration::from_millis(self.branch_timeout_ms),
            default_radius_km: self.default_radius_km,
            default_limit: self.default_limit,
            max_limit: self.max_limit.min(MAX_PROXIMITY_RESULTS),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.branch_timeout_ms == 0 {
            return Err("search.branch_timeout_ms must be greater than 0".to_string());
        }

        if !self.default_radius_km.is_finite() || self.default_radius_km <= 0.0 {
            return Err("search.default_radius_km must be a positive number".to_string());
        }

        if self.default_limit == 0 || self.max_limit == 0 {
            return Err("search.default_limit and search.max_limit must be greater than 0".to_string());
        }

        if self.default_limit > self.max_limit {
            return Err("search.default_limit must not exceed search.max_limit".to_string());
        }

        Ok(())
    }
}
