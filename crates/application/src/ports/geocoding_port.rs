//! Geocoding service port
//!
//! Address search, reverse lookup and POI search against external providers.
//! Implementations pick a provider by the `prefer_swiss` flag and may fall
//! back to the alternate one; a total failure is reported as
//! `ApplicationError::UpstreamUnavailable` so callers can degrade.

use async_trait::async_trait;
use domain::{GeoPoint, GeocodeResult, PointOfInterest};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for geocoding operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a free-form address to candidate positions
    async fn geocode(
        &self,
        address: &str,
        prefer_swiss: bool,
    ) -> Result<Vec<GeocodeResult>, ApplicationError>;

    /// Resolve a position to human-readable addresses
    async fn reverse_geocode(
        &self,
        point: &GeoPoint,
        prefer_swiss: bool,
    ) -> Result<Vec<GeocodeResult>, ApplicationError>;

    /// Named points of interest within `radius_meters` of `point`
    async fn find_nearby_pois(
        &self,
        point: &GeoPoint,
        radius_meters: u32,
    ) -> Result<Vec<PointOfInterest>, ApplicationError>;

    /// Check if at least one provider is reachable
    async fn is_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn GeocodingPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GeocodingPort>();
    }
}
