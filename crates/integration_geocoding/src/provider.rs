//! Provider traits implemented by the HTTP clients

use async_trait::async_trait;
use domain::{GeoPoint, GeocodeProvider, GeocodeResult, PointOfInterest};

use crate::error::GeocodingError;

/// An address search / reverse lookup service
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Which provider family this client belongs to
    fn kind(&self) -> GeocodeProvider;

    /// Resolve a free-form address, best match first
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, GeocodingError>;

    /// Resolve a position to nearby addresses, closest first
    async fn reverse_geocode(&self, point: &GeoPoint) -> Result<Vec<GeocodeResult>, GeocodingError>;

    /// Check if the provider is reachable
    async fn is_healthy(&self) -> bool;
}

/// A named-places search service
#[async_trait]
pub trait PoiProvider: Send + Sync {
    /// Named points of interest within `radius_meters`, closest first
    async fn find_pois(
        &self,
        point: &GeoPoint,
        radius_meters: u32,
    ) -> Result<Vec<PointOfInterest>, GeocodingError>;

    /// Check if the provider is reachable
    async fn is_healthy(&self) -> bool;
}
