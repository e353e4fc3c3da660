//! Great-circle distance and travel-time heuristics

use crate::entities::TravelEstimate;
use crate::value_objects::GeoPoint;

/// Mean Earth radius used by the Haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average road speed assumed for driving estimates
pub const DRIVING_SPEED_KMH: f64 = 50.0;

/// Average walking speed assumed for walking estimates
pub const WALKING_SPEED_KMH: f64 = 4.0;

/// Great-circle distance between two WGS84 points in kilometers
#[must_use]
pub fn haversine_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1_rad = a.latitude().to_radians();
    let lat2_rad = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lon = (b.longitude() - a.longitude()).to_radians();

    let h = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
        (delta_lon / 2.0).sin().powi(2),
        (delta_lat / 2.0).sin().powi(2),
    );
    // Guard against h drifting just above 1.0 for antipodal points
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());

    EARTH_RADIUS_KM * c
}

/// Linear travel-time estimate for a straight-line distance
///
/// Minutes are rounded up; negative or non-finite distances count as zero.
#[must_use]
pub fn estimate_travel(distance_km: f64) -> TravelEstimate {
    TravelEstimate::new(
        minutes_at(distance_km, DRIVING_SPEED_KMH),
        minutes_at(distance_km, WALKING_SPEED_KMH),
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to [0, u32::MAX] first
fn minutes_at(distance_km: f64, speed_kmh: f64) -> u32 {
    if !distance_km.is_finite() || distance_km <= 0.0 {
        return 0;
    }
    let minutes = (distance_km / speed_kmh * 60.0).ceil();
    minutes.min(f64::from(u32::MAX)) as u32
}
