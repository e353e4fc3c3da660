//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Latitude or longitude outside the WGS84 value range
    #[error(
        "Invalid coordinates ({latitude}, {longitude}): latitude must be -90 to 90, longitude must be -180 to 180"
    )]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Well-formed WGS84 coordinates that are not inside Switzerland
    #[error("Coordinates ({latitude}, {longitude}) are outside Switzerland")]
    OutsideSwitzerland { latitude: f64, longitude: f64 },

    /// LV95 coordinates outside the Swiss grid envelope
    #[error("Swiss grid coordinates (E {east}, N {north}) are outside the LV95 envelope")]
    OutsideSwissGrid { east: f64, north: f64 },

    /// Entity not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Whether this error means "valid input, wrong place"
    #[must_use]
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            Self::OutsideSwitzerland { .. } | Self::OutsideSwissGrid { .. }
        )
    }
}
