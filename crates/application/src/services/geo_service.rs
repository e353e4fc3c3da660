//! Geographic utility service
//!
//! Address lookup, reverse lookup, POI search, LV95 conversion and
//! point-to-point distance. Upstream geocoder failures are logged and turned
//! into empty result lists; input errors are always surfaced.

use std::{fmt, sync::Arc};

use domain::geo::{
    ensure_within_switzerland, estimate_travel, haversine_km, parse_swiss_grid, to_swiss_grid,
    to_wgs84,
};
use domain::{GeoPoint, GeocodeResult, PointOfInterest, SwissGridPoint, TravelEstimate};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::{error::ApplicationError, ports::GeocodingPort};

/// Default POI search radius in meters
pub const DEFAULT_POI_RADIUS_M: u32 = 1000;

/// Largest POI search radius in meters
pub const MAX_POI_RADIUS_M: u32 = 5000;

/// Great-circle distance between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceEstimate {
    pub distance_km: f64,
    pub travel_time: TravelEstimate,
}

/// Service for geocoding and coordinate utilities
pub struct GeoService {
    geocoder: Arc<dyn GeocodingPort>,
}

impl fmt::Debug for GeoService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoService").finish_non_exhaustive()
    }
}

impl GeoService {
    /// Create a new geo service
    pub fn new(geocoder: Arc<dyn GeocodingPort>) -> Self {
        Self { geocoder }
    }

    /// Forward geocode an address
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a blank address. Upstream failures yield an
    /// empty list.
    #[instrument(skip(self))]
    pub async fn geocode(
        &self,
        address: &str,
        prefer_swiss: bool,
    ) -> Result<Vec<GeocodeResult>, ApplicationError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ApplicationError::InvalidArgument(
                "address must not be empty".to_string(),
            ));
        }

        Ok(degrade(
            "geocode",
            self.geocoder.geocode(address, prefer_swiss).await,
        ))
    }

    /// Reverse geocode a position
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if the position is outside Switzerland.
    #[instrument(skip(self), fields(point = %point))]
    pub async fn reverse_geocode(
        &self,
        point: &GeoPoint,
        prefer_swiss: bool,
    ) -> Result<Vec<GeocodeResult>, ApplicationError> {
        ensure_within_switzerland(point)?;
        Ok(degrade(
            "reverse_geocode",
            self.geocoder.reverse_geocode(point, prefer_swiss).await,
        ))
    }

    /// Points of interest around a position
    ///
    /// `radius_meters` defaults to [`DEFAULT_POI_RADIUS_M`] and is capped at
    /// [`MAX_POI_RADIUS_M`].
    ///
    /// # Errors
    ///
    /// `OutOfBounds` for a non-Swiss position, `InvalidArgument` for a zero radius.
    #[instrument(skip(self), fields(point = %point))]
    pub async fn nearby_pois(
        &self,
        point: &GeoPoint,
        radius_meters: Option<u32>,
    ) -> Result<Vec<PointOfInterest>, ApplicationError> {
        ensure_within_switzerland(point)?;
        let radius = radius_meters.unwrap_or(DEFAULT_POI_RADIUS_M);
        if radius == 0 {
            return Err(ApplicationError::InvalidArgument(
                "radius must be greater than 0".to_string(),
            ));
        }
        let radius = radius.min(MAX_POI_RADIUS_M);

        Ok(degrade(
            "nearby_pois",
            self.geocoder.find_nearby_pois(point, radius).await,
        ))
    }

    /// Project a WGS84 position onto LV95
    ///
    /// # Errors
    ///
    /// `OutOfBounds` outside the Swiss envelope.
    pub fn to_swiss_grid(&self, point: &GeoPoint) -> Result<SwissGridPoint, ApplicationError> {
        ensure_within_switzerland(point)?;
        Ok(to_swiss_grid(point))
    }

    /// Convert LV95 coordinates back to WGS84
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for non-finite input, `OutOfBounds` outside the LV95 envelope.
    pub fn from_swiss_grid(&self, east: f64, north: f64) -> Result<GeoPoint, ApplicationError> {
        let grid = parse_swiss_grid(east, north)?;
        Ok(to_wgs84(&grid))
    }

    /// Distance and travel estimate between two positions
    ///
    /// # Errors
    ///
    /// `OutOfBounds` if either position is outside Switzerland.
    pub fn distance(&self, from: &GeoPoint, to: &GeoPoint) -> Result<DistanceEstimate, ApplicationError> {
        ensure_within_switzerland(from)?;
        ensure_within_switzerland(to)?;
        let distance_km = haversine_km(from, to);
        Ok(DistanceEstimate {
            distance_km,
            travel_time: estimate_travel(distance_km),
        })
    }
}

fn degrade<T>(operation: &str, result: Result<Vec<T>, ApplicationError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(operation, error = %e, "Geocoder unavailable, returning no results");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockGeocodingPort;
    use domain::GeocodeProvider;

    fn service(geocoder: MockGeocodingPort) -> GeoService {
        GeoService::new(Arc::new(geocoder))
    }

    #[tokio::test]
    async fn geocode_trims_and_forwards_address() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_geocode()
            .withf(|address, swiss| address == "Bundesplatz 3, Bern" && *swiss)
            .returning(|_, _| {
                Ok(vec![GeocodeResult::new(
                    GeoPoint::bern(),
                    "Bundesplatz 3, 3011 Bern",
                    0.9,
                    GeocodeProvider::Swiss,
                )])
            });

        let results = service(geocoder)
            .geocode("  Bundesplatz 3, Bern ", true)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source_provider, GeocodeProvider::Swiss);
    }

    #[tokio::test]
    async fn blank_address_is_invalid() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder.expect_geocode().never();

        let result = service(geocoder).geocode("   ", true).await;
        assert!(matches!(result, Err(ApplicationError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn upstream_failure_degrades_to_empty() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_geocode()
            .returning(|_, _| Err(ApplicationError::upstream("swiss", "connection refused")));

        let results = service(geocoder).geocode("Sion", false).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn reverse_geocode_rejects_foreign_points() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder.expect_reverse_geocode().never();

        let result = service(geocoder)
            .reverse_geocode(&GeoPoint::london(), true)
            .await;
        assert!(matches!(result, Err(ApplicationError::OutOfBounds(_))));
    }

    #[tokio::test]
    async fn poi_radius_is_defaulted_and_capped() {
        let mut geocoder = MockGeocodingPort::new();
        geocoder
            .expect_find_nearby_pois()
            .withf(|_, radius| *radius == DEFAULT_POI_RADIUS_M)
            .times(1)
            .returning(|_, _| Ok(vec![]));
        geocoder
            .expect_find_nearby_pois()
            .withf(|_, radius| *radius == MAX_POI_RADIUS_M)
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let service = service(geocoder);
        service.nearby_pois(&GeoPoint::sion(), None).await.unwrap();
        service
            .nearby_pois(&GeoPoint::sion(), Some(50_000))
            .await
            .unwrap();
    }

    #[test]
    fn swiss_grid_conversion_round_trips() {
        let service = service(MockGeocodingPort::new());
        let grid = service.to_swiss_grid(&GeoPoint::bern()).unwrap();
        let back = service.from_swiss_grid(grid.east(), grid.north()).unwrap();

        assert!((back.latitude() - 46.948).abs() < 1e-4);
        assert!((back.longitude() - 7.4474).abs() < 1e-4);
    }

    #[test]
    fn from_swiss_grid_rejects_lv03_values() {
        let service = service(MockGeocodingPort::new());
        let result = service.from_swiss_grid(600_000.0, 200_000.0);
        assert!(matches!(result, Err(ApplicationError::OutOfBounds(_))));
    }

    #[test]
    fn distance_between_bern_and_sion() {
        let service = service(MockGeocodingPort::new());
        let estimate = service
            .distance(&GeoPoint::bern(), &GeoPoint::sion())
            .unwrap();

        assert!((estimate.distance_km - 79.77).abs() < 0.05);
        assert_eq!(estimate.travel_time.driving_minutes, 96);
        assert!(estimate.travel_time.estimated);
    }
}
