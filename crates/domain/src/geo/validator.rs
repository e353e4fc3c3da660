//! Swiss bounding-envelope check
//!
//! Coarse rectangle, not a border polygon: permissive at the edges so that
//! points close to a real border are never rejected.

use crate::errors::DomainError;
use crate::value_objects::GeoPoint;

/// An inclusive latitude/longitude rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingEnvelope {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingEnvelope {
    /// Whether `point` lies inside the envelope (edges included)
    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&point.latitude())
            && (self.min_longitude..=self.max_longitude).contains(&point.longitude())
    }
}

/// Envelope accepted as "in Switzerland"
pub const SWISS_ENVELOPE: BoundingEnvelope = BoundingEnvelope {
    min_latitude: 45.5,
    max_latitude: 48.0,
    min_longitude: 5.5,
    max_longitude: 11.0,
};

/// Returns true iff `point` is inside the Swiss envelope
#[must_use]
pub fn is_valid_swiss_coordinate(point: &GeoPoint) -> bool {
    SWISS_ENVELOPE.contains(point)
}

/// Same check, as a `Result` for `?`-style callers
///
/// # Errors
///
/// Returns `DomainError::OutsideSwitzerland` when the point is outside the envelope.
pub fn ensure_within_switzerland(point: &GeoPoint) -> Result<(), DomainError> {
    if is_valid_swiss_coordinate(point) {
        Ok(())
    } else {
        Err(DomainError::OutsideSwitzerland {
            latitude: point.latitude(),
            longitude: point.longitude(),
        })
    }
}
