//! Swiss LV95 grid point value object

use serde::Serialize;
use std::fmt;

/// A position in the Swiss CH1903+/LV95 projected frame, in meters
///
/// Only produced by [`crate::geo::transform`]; there is deliberately no public
/// constructor so a grid point always comes from a projection or a
/// range-checked parse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwissGridPoint {
    /// Easting in meters (E, around 2 600 000 at Bern)
    east: f64,
    /// Northing in meters (N, around 1 200 000 at Bern)
    north: f64,
}

impl SwissGridPoint {
    pub(crate) const fn new(east: f64, north: f64) -> Self {
        Self { east, north }
    }

    /// Get the easting
    #[must_use]
    pub const fn east(&self) -> f64 {
        self.east
    }

    /// Get the northing
    #[must_use]
    pub const fn north(&self) -> f64 {
        self.north
    }
}

impl fmt::Display for SwissGridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E {:.2} / N {:.2}", self.east, self.north)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_and_display() {
        let point = SwissGridPoint::new(2_600_000.0, 1_200_000.0);
        assert!((point.east() - 2_600_000.0).abs() < f64::EPSILON);
        assert!((point.north() - 1_200_000.0).abs() < f64::EPSILON);
        assert_eq!(point.to_string(), "E 2600000.00 / N 1200000.00");
    }

    #[test]
    fn test_serializes_east_north() {
        let json = serde_json::to_string(&SwissGridPoint::new(2_600_000.5, 1_199_999.5))
            .expect("serialize");
        assert_eq!(json, r#"{"east":2600000.5,"north":1199999.5}"#);
    }
}
