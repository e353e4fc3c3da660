//! Application-level errors
//!
//! `InvalidArgument` and `OutOfBounds` are deterministic caller errors and are
//! surfaced immediately. `UpstreamUnavailable` is transient and isolated per
//! sub-search by the services; it never fails a whole aggregated request.

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Clone, Error)]
pub enum ApplicationError {
    /// Missing or malformed parameters
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Well-formed coordinates outside the supported area
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    /// An external provider failed or timed out
    #[error("Upstream '{provider}' unavailable: {message}")]
    UpstreamUnavailable {
        /// Provider name (e.g. `swisstopo`, `nominatim`)
        provider: String,
        /// Failure description
        message: String,
    },

    /// A requested catalogue entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Create an upstream error
    pub fn upstream(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { .. })
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::OutsideSwitzerland { .. } | DomainError::OutsideSwissGrid { .. } => {
                Self::OutOfBounds(err.to_string())
            },
            DomainError::NotFound { .. } => Self::NotFound(err.to_string()),
            DomainError::InvalidCoordinates { .. } | DomainError::ValidationError(_) => {
                Self::InvalidArgument(err.to_string())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_upstream_errors_are_retryable() {
        assert!(ApplicationError::upstream("nominatim", "timeout").is_retryable());
        assert!(!ApplicationError::InvalidArgument("lat".to_string()).is_retryable());
        assert!(!ApplicationError::OutOfBounds("london".to_string()).is_retryable());
        assert!(!ApplicationError::NotFound("site 1".to_string()).is_retryable());
    }

    #[test]
    fn domain_errors_map_to_taxonomy() {
        let err: ApplicationError = DomainError::OutsideSwitzerland {
            latitude: 51.5,
            longitude: -0.12,
        }
        .into();
        assert!(matches!(err, ApplicationError::OutOfBounds(_)));

        let err: ApplicationError = DomainError::InvalidCoordinates {
            latitude: 100.0,
            longitude: 0.0,
        }
        .into();
        assert!(matches!(err, ApplicationError::InvalidArgument(_)));

        let err: ApplicationError = DomainError::not_found("Site", "9").into();
        assert!(matches!(err, ApplicationError::NotFound(ref msg) if msg.contains("Site")));
    }

    #[test]
    fn upstream_message_names_provider() {
        let err = ApplicationError::upstream("swisstopo", "HTTP 503");
        assert_eq!(err.to_string(), "Upstream 'swisstopo' unavailable: HTTP 503");
    }
}
