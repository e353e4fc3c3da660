//! Geocoding results produced by external providers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoPoint;

/// Which provider family produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocodeProvider {
    /// Swiss national geodata service (swisstopo / GeoAdmin)
    Swiss,
    /// Generic OpenStreetMap-style service
    Generic,
}

impl GeocodeProvider {
    /// The provider tried when this one fails
    #[must_use]
    pub const fn alternate(self) -> Self {
        match self {
            Self::Swiss => Self::Generic,
            Self::Generic => Self::Swiss,
        }
    }

    /// Stable lowercase name for logs and metrics
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Swiss => "swiss",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for GeocodeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geocoded address or place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Resolved position (WGS84)
    pub position: GeoPoint,
    /// Human-readable address
    pub label: String,
    /// Provider confidence in [0, 1]
    pub confidence: f64,
    /// Provider family that produced the result
    pub source_provider: GeocodeProvider,
}

impl GeocodeResult {
    /// Create a result, clamping confidence into [0, 1]
    pub fn new(
        position: GeoPoint,
        label: impl Into<String>,
        confidence: f64,
        source_provider: GeocodeProvider,
    ) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            position,
            label: label.into(),
            confidence,
            source_provider,
        }
    }
}

/// A named point of interest returned by a places provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Display name
    pub name: String,
    /// Category tag (e.g. `parking`, `alpine_hut`, `bus_stop`)
    pub category: String,
    /// Position (WGS84)
    pub position: GeoPoint,
    /// Straight-line distance from the query point in meters
    pub distance_m: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_is_clamped() {
        let high = GeocodeResult::new(GeoPoint::bern(), "Bern", 3.0, GeocodeProvider::Swiss);
        assert!((high.confidence - 1.0).abs() < f64::EPSILON);
        let low = GeocodeResult::new(GeoPoint::bern(), "Bern", -1.0, GeocodeProvider::Swiss);
        assert!(low.confidence.abs() < f64::EPSILON);
        let nan = GeocodeResult::new(GeoPoint::bern(), "Bern", f64::NAN, GeocodeProvider::Generic);
        assert!(nan.confidence.abs() < f64::EPSILON);
    }

    #[test]
    fn provider_alternates() {
        assert_eq!(GeocodeProvider::Swiss.alternate(), GeocodeProvider::Generic);
        assert_eq!(GeocodeProvider::Generic.alternate(), GeocodeProvider::Swiss);
    }

    #[test]
    fn provider_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&GeocodeProvider::Swiss).unwrap(),
            "\"swiss\""
        );
        assert_eq!(GeocodeProvider::Generic.to_string(), "generic");
    }
}
