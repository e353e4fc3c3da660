//! Nominatim (OpenStreetMap) client
//!
//! Generic fallback geocoder. Requests are spaced by
//! `min_request_interval_ms` to respect the public instance usage policy.

use std::time::Duration;

use async_trait::async_trait;
use domain::{GeoPoint, GeocodeProvider, GeocodeResult};
use reqwest::Client;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::config::GeocodingConfig;
use crate::error::GeocodingError;
use crate::http::{build_client, get_json, probe};
use crate::models::NominatimPlace;
use crate::provider::GeocodingProvider;

const ACCEPT_LANGUAGE: &str = "de,fr,it,en";

/// Rate-limited Nominatim client
#[derive(Debug)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
    country_filter: String,
    result_limit: u8,
    timeout_secs: u64,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimClient {
    /// Create a new Nominatim client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.nominatim_base_url.trim_end_matches('/').to_string(),
            country_filter: config.country_filter.clone(),
            result_limit: config.result_limit,
            timeout_secs: config.timeout_secs,
            min_interval: Duration::from_millis(config.min_request_interval_ms),
            last_request: Mutex::new(None),
        })
    }

    /// Wait until `min_interval` has passed since the previous request
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting Nominatim request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[async_trait]
impl GeocodingProvider for NominatimClient {
    fn kind(&self) -> GeocodeProvider {
        GeocodeProvider::Generic
    }

    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>, GeocodingError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodingError::InvalidQuery(
                "Address must not be empty".to_string(),
            ));
        }

        self.rate_limit().await;

        let url = format!("{}/search", self.base_url);
        let mut params = vec![
            ("q", address.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", self.result_limit.to_string()),
            ("accept-language", ACCEPT_LANGUAGE.to_string()),
        ];
        if !self.country_filter.is_empty() {
            params.push(("countrycodes", self.country_filter.clone()));
        }

        let places: Vec<NominatimPlace> =
            get_json(&self.client, &url, &params, self.timeout_secs).await?;

        let results: Vec<GeocodeResult> = places
            .into_iter()
            .enumerate()
            .filter_map(|(index, place)| place.into_result(index))
            .collect();
        debug!(count = results.len(), "Nominatim geocode");
        Ok(results)
    }

    #[instrument(skip(self), fields(point = %point))]
    async fn reverse_geocode(&self, point: &GeoPoint) -> Result<Vec<GeocodeResult>, GeocodingError> {
        self.rate_limit().await;

        let url = format!("{}/reverse", self.base_url);
        let params = [
            ("lat", point.latitude().to_string()),
            ("lon", point.longitude().to_string()),
            ("format", "jsonv2".to_string()),
            ("accept-language", ACCEPT_LANGUAGE.to_string()),
        ];

        let place: NominatimPlace = get_json(&self.client, &url, &params, self.timeout_secs).await?;
        Ok(place.into_result(0).into_iter().collect())
    }

    async fn is_healthy(&self) -> bool {
        let url = format!("{}/status", self.base_url);
        probe(&self.client, &url, &[("format", "json".to_string())]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rate_limit_spaces_requests() {
        let config = GeocodingConfig {
            min_request_interval_ms: 50,
            ..GeocodingConfig::for_testing()
        };
        let client = NominatimClient::new(&config).unwrap();

        let started = Instant::now();
        client.rate_limit().await;
        client.rate_limit().await;
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn first_request_is_not_delayed() {
        let config = GeocodingConfig {
            min_request_interval_ms: 5_000,
            ..GeocodingConfig::for_testing()
        };
        let client = NominatimClient::new(&config).unwrap();

        let started = Instant::now();
        client.rate_limit().await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn kind_is_generic() {
        let client = NominatimClient::new(&GeocodingConfig::for_testing()).unwrap();
        assert_eq!(client.kind(), GeocodeProvider::Generic);
    }
}
