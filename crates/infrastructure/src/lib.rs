//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the catalogue snapshot
//! and the geocoding provider stack. Also owns configuration loading and
//! logging setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, CatalogConfig, SearchAppConfig, ServerConfig};
pub use telemetry::{DEFAULT_LOG_FILTER, LogFormat, TelemetryError, init_logging};
