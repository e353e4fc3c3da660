//! WGS84 <-> CH1903+/LV95 conversion
//!
//! Approximate polynomial formulas published by swisstopo. Accuracy is in the
//! order of one meter inside Switzerland; the two directions are not exact
//! inverses of each other. No envelope validation happens here.

use crate::errors::DomainError;
use crate::value_objects::{GeoPoint, SwissGridPoint};

/// Range accepted when a grid point comes from outside (E, N in meters)
///
/// Wide enough to hold the projection of the whole WGS84 Swiss envelope.
const LV95_EAST_RANGE: std::ops::RangeInclusive<f64> = 2_440_000.0..=2_870_000.0;
const LV95_NORTH_RANGE: std::ops::RangeInclusive<f64> = 1_040_000.0..=1_330_000.0;

/// Project a WGS84 point onto the Swiss LV95 grid
#[must_use]
pub fn to_swiss_grid(point: &GeoPoint) -> SwissGridPoint {
    // Auxiliary values: sexagesimal seconds relative to Bern, in 10 000" units
    let phi = point.latitude().mul_add(3600.0, -169_028.66) / 10_000.0;
    let lambda = point.longitude().mul_add(3600.0, -26_782.5) / 10_000.0;

    let east = 2_600_072.37 + 211_455.93 * lambda
        - 10_938.51 * lambda * phi
        - 0.36 * lambda * phi.powi(2)
        - 44.54 * lambda.powi(3);

    let north = 1_200_147.07
        + 308_807.95 * phi
        + 3_745.25 * lambda.powi(2)
        + 76.63 * phi.powi(2)
        - 194.56 * lambda.powi(2) * phi
        + 119.79 * phi.powi(3);

    SwissGridPoint::new(east, north)
}

/// Convert an LV95 grid point back to WGS84
#[must_use]
pub fn to_wgs84(grid: &SwissGridPoint) -> GeoPoint {
    // Auxiliary values relative to Bern, in 1 000 km units
    let y = (grid.east() - 2_600_000.0) / 1_000_000.0;
    let x = (grid.north() - 1_200_000.0) / 1_000_000.0;

    let lambda = 2.677_909_4 + 4.728_982 * y + 0.791_484 * y * x + 0.1306 * y * x.powi(2)
        - 0.0436 * y.powi(3);

    let phi = 16.902_389_2 + 3.238_272 * x
        - 0.270_978 * y.powi(2)
        - 0.002_528 * x.powi(2)
        - 0.0447 * y.powi(2) * x
        - 0.0140 * x.powi(3);

    // Unit 10 000" -> degrees
    GeoPoint::new_unchecked(phi * 100.0 / 36.0, lambda * 100.0 / 36.0)
}

/// Build a grid point from external input, checking the LV95 envelope
///
/// # Errors
///
/// Returns `DomainError::OutsideSwissGrid` when either value is outside the
/// envelope or not finite.
pub fn parse_swiss_grid(east: f64, north: f64) -> Result<SwissGridPoint, DomainError> {
    if LV95_EAST_RANGE.contains(&east) && LV95_NORTH_RANGE.contains(&north) {
        Ok(SwissGridPoint::new(east, north))
    } else {
        Err(DomainError::OutsideSwissGrid { east, north })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dms(degrees: f64, minutes: f64, seconds: f64) -> f64 {
        degrees + minutes / 60.0 + seconds / 3600.0
    }

    #[test]
    fn swisstopo_reference_point() {
        // Worked example from the swisstopo formula sheet
        let point = GeoPoint::new_unchecked(dms(46.0, 2.0, 38.87), dms(8.0, 43.0, 49.79));
        let grid = to_swiss_grid(&point);
        assert!((grid.east() - 2_700_000.0).abs() < 1.0, "east = {}", grid.east());
        assert!((grid.north() - 1_100_000.0).abs() < 1.0, "north = {}", grid.north());
    }

    #[test]
    fn bern_projects_near_grid_origin() {
        let grid = to_swiss_grid(&GeoPoint::bern());
        assert!((grid.east() - 2_600_667.0).abs() < 5.0);
        assert!((grid.north() - 1_199_657.0).abs() < 5.0);
    }

    #[test]
    fn round_trip_within_tolerance() {
        let original = GeoPoint::new_unchecked(46.1817, 7.1947);
        let back = to_wgs84(&to_swiss_grid(&original));
        assert!((back.latitude() - original.latitude()).abs() < 0.0001);
        assert!((back.longitude() - original.longitude()).abs() < 0.0001);
    }

    #[test]
    fn grid_origin_maps_to_old_bern_observatory() {
        let point = to_wgs84(&SwissGridPoint::new(2_600_000.0, 1_200_000.0));
        assert!((point.latitude() - 46.951).abs() < 0.001);
        assert!((point.longitude() - 7.4386).abs() < 0.001);
    }

    #[test]
    fn parse_accepts_swiss_grid_values() {
        let grid = parse_swiss_grid(2_600_000.0, 1_200_000.0).unwrap();
        assert!((grid.east() - 2_600_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_rejects_lv03_and_garbage() {
        // LV03 values (missing the leading 2/1 digit) are a common mix-up
        assert!(parse_swiss_grid(600_000.0, 200_000.0).is_err());
        assert!(parse_swiss_grid(f64::NAN, 1_200_000.0).is_err());
        let err = parse_swiss_grid(2_600_000.0, 2_000_000.0).unwrap_err();
        assert!(err.is_out_of_bounds());
    }
}
