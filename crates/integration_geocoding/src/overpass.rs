//! Overpass API client for named points of interest

use async_trait::async_trait;
use domain::{GeoPoint, PointOfInterest};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::GeocodingConfig;
use crate::error::GeocodingError;
use crate::http::{build_client, get_json, probe};
use crate::models::OverpassResponse;
use crate::provider::PoiProvider;

/// Tag filters included in a POI query; each must also carry a `name`
const POI_FILTERS: [&str; 5] = ["tourism", "amenity", "natural", "leisure", "public_transport"];

/// Client for an Overpass interpreter endpoint
#[derive(Debug)]
pub struct OverpassClient {
    client: Client,
    base_url: String,
    poi_limit: u16,
    timeout_secs: u64,
}

impl OverpassClient {
    /// Create a new Overpass client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.overpass_base_url.trim_end_matches('/').to_string(),
            poi_limit: config.poi_limit,
            timeout_secs: config.timeout_secs,
        })
    }

    /// Overpass QL for named nodes and ways around `point`
    fn build_query(&self, point: &GeoPoint, radius_meters: u32) -> String {
        let around = format!(
            "(around:{radius_meters},{},{})",
            point.latitude(),
            point.longitude()
        );
        let mut query = format!("[out:json][timeout:{}];(", self.timeout_secs);
        for filter in POI_FILTERS {
            query.push_str(&format!("node{around}[name][{filter}];"));
            query.push_str(&format!("way{around}[name][{filter}];"));
        }
        query.push_str(");out center;");
        query
    }
}

#[async_trait]
impl PoiProvider for OverpassClient {
    #[instrument(skip(self), fields(point = %point))]
    async fn find_pois(
        &self,
        point: &GeoPoint,
        radius_meters: u32,
    ) -> Result<Vec<PointOfInterest>, GeocodingError> {
        if radius_meters == 0 {
            return Err(GeocodingError::InvalidQuery(
                "radius must be greater than 0".to_string(),
            ));
        }

        let url = format!("{}/interpreter", self.base_url);
        let params = [("data", self.build_query(point, radius_meters))];
        let response: OverpassResponse =
            get_json(&self.client, &url, &params, self.timeout_secs).await?;

        let pois = response.into_pois(point, usize::from(self.poi_limit));
        debug!(count = pois.len(), "Overpass POI search");
        Ok(pois)
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}/status", self.base_url);
        probe(&self.client, &url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_covers_every_filter() {
        let client = OverpassClient::new(&GeocodingConfig::for_testing()).unwrap();
        let query = client.build_query(&GeoPoint::sion(), 800);

        assert!(query.starts_with("[out:json][timeout:5];("));
        assert!(query.contains("node(around:800,46.2331,7.3606)[name][tourism];"));
        assert!(query.contains("way(around:800,46.2331,7.3606)[name][public_transport];"));
        assert!(query.ends_with(");out center;"));
    }

    #[tokio::test]
    async fn zero_radius_is_rejected_locally() {
        let client = OverpassClient::new(&GeocodingConfig::for_testing()).unwrap();
        let err = client.find_pois(&GeoPoint::sion(), 0).await.unwrap_err();
        assert!(matches!(err, GeocodingError::InvalidQuery(_)));
    }
}
