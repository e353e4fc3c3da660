//! swisstopo GeoAdmin client
//!
//! Forward search via `SearchServer` (address origin) and reverse lookup via
//! `MapServer/identify` against the federal building register
//! (`ch.bfs.gebaeude_wohnungs_register`). Both are queried in WGS84 (`sr=4326`).

use async_trait::async_trait;
use domain::{GeoPoint, GeocodeProvider, GeocodeResult};
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::GeocodingConfig;
use crate::error::GeocodingError;
use crate::http::{build_client, get_json, probe};
use crate::models::{SwissIdentifyResponse, SwissSearchResponse};
use crate::provider::GeocodingProvider;

const WGS84_SR: &str = "4326";
const BUILDING_REGISTER_LAYER: &str = "all:ch.bfs.gebaeude_wohnungs_register";
/// Identify tolerance in pixels of the virtual 100x100 map display
const IDENTIFY_TOLERANCE: &str = "50";

/// Client for the Swiss national geodata API
#[derive(Debug)]
pub struct SwisstopoClient {
    client: Client,
    base_url: String,
    result_limit: u8,
    timeout_secs: u64,
}

impl SwisstopoClient {
    /// Create a new swisstopo client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.swisstopo_base_url.trim_end_matches('/').to_string(),
            result_limit: config.result_limit,
            timeout_secs: config.timeout_secs,
        })
    }

    fn search_params(&self, text: &str, limit: u8) -> Vec<(&'static str, String)> {
        vec![
            ("searchText", text.to_string()),
            ("type", "locations".to_string()),
            ("origins", "address".to_string()),
            ("limit", limit.to_string()),
            ("sr", WGS84_SR.to_string()),
            ("geometryFormat", "geojson".to_string()),
        ]
    }
}

#[async_trait]
impl GeocodingProvider for SwisstopoClient {
    fn kind(&self) -> GeocodeProvider {
        GeocodeProvider::Swiss
    }

    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, GeocodingError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodingError::InvalidQuery(
                "Address must not be empty".to_string(),
            ));
        }

        let url = format!("{}/SearchServer", self.base_url);
        let params = self.search_params(address, self.result_limit);
        let response: SwissSearchResponse =
            get_json(&self.client, &url, &params, self.timeout_secs).await?;

        let results = response.into_results();
        debug!(count = results.len(), "swisstopo geocode");
        Ok(results)
    }

    #[instrument(skip(self), fields(point = %point))]
    async fn reverse_geocode(&self, point: &GeoPoint) -> Result<Vec<GeocodeResult>, GeocodingError> {
        let url = format!("{}/MapServer/identify", self.base_url);
        let params = [
            (
                "geometry",
                format!("{},{}", point.longitude(), point.latitude()),
            ),
            ("geometryType", "esriGeometryPoint".to_string()),
            ("layers", BUILDING_REGISTER_LAYER.to_string()),
            ("mapExtent", "0,0,100,100".to_string()),
            ("imageDisplay", "100,100,100".to_string()),
            ("tolerance", IDENTIFY_TOLERANCE.to_string()),
            ("geometryFormat", "geojson".to_string()),
            ("returnGeometry", "true".to_string()),
            ("sr", WGS84_SR.to_string()),
        ];
        let response: SwissIdentifyResponse =
            get_json(&self.client, &url, &params, self.timeout_secs).await?;

        let mut results = response.into_results(point);
        results.truncate(usize::from(self.result_limit));
        debug!(count = results.len(), "swisstopo reverse geocode");
        Ok(results)
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}/SearchServer", self.base_url);
        probe(&self.client, &url, &self.search_params("Bern", 1)).await
    }
}
