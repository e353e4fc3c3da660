//! Logging infrastructure

mod logging;

pub use logging::{DEFAULT_LOG_FILTER, LogFormat, TelemetryError, init_logging};
