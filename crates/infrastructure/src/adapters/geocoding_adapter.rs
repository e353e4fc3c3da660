//! Geocoding adapter - Implements GeocodingPort over the provider clients
//!
//! The preferred provider (Swiss or generic, per request) is tried first. On
//! an error or an empty answer the alternate provider is tried exactly once.
//! Forward lookups are cached per (provider, normalised address).

use std::{
    fmt,
    sync::Arc,
    time::{Duration, Instant},
};

use application::{error::ApplicationError, ports::GeocodingPort};
use async_trait::async_trait;
use domain::{GeoPoint, GeocodeProvider, GeocodeResult, PointOfInterest};
use integration_geocoding::{
    GeocodingConfig, GeocodingError, GeocodingProvider, NominatimClient, OverpassClient,
    PoiProvider, SwisstopoClient,
};
use moka::future::Cache;
use tracing::{debug, info, instrument, warn};

/// Maximum number of cached forward lookups
const CACHE_CAPACITY: u64 = 10_000;

type CacheKey = (GeocodeProvider, String);

#[derive(Debug, Clone, Copy)]
enum Lookup<'a> {
    Forward(&'a str),
    Reverse(&'a GeoPoint),
}

impl Lookup<'_> {
    const fn operation(self) -> &'static str {
        match self {
            Self::Forward(_) => "geocode",
            Self::Reverse(_) => "reverse_geocode",
        }
    }
}

/// Adapter combining the Swiss and generic geocoders and the POI provider
pub struct GeocodingAdapter {
    swiss: Arc<dyn GeocodingProvider>,
    generic: Arc<dyn GeocodingProvider>,
    pois: Arc<dyn PoiProvider>,
    cache: Option<Cache<CacheKey, Vec<GeocodeResult>>>,
}

impl fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("swiss", &self.swiss.kind())
            .field("generic", &self.generic.kind())
            .field(
                "cached_entries",
                &self.cache.as_ref().map(Cache::entry_count),
            )
            .finish_non_exhaustive()
    }
}

impl GeocodingAdapter {
    /// Create an adapter from provider implementations, without caching
    pub fn new(
        swiss: Arc<dyn GeocodingProvider>,
        generic: Arc<dyn GeocodingProvider>,
        pois: Arc<dyn PoiProvider>,
    ) -> Self {
        Self {
            swiss,
            generic,
            pois,
            cache: None,
        }
    }

    /// Build the swisstopo / Nominatim / Overpass stack from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be initialized.
    pub fn from_config(config: &GeocodingConfig) -> Result<Self, GeocodingError> {
        let adapter = Self::new(
            Arc::new(SwisstopoClient::new(config)?),
            Arc::new(NominatimClient::new(config)?),
            Arc::new(OverpassClient::new(config)?),
        );

        Ok(if config.caching_enabled() {
            adapter.with_cache(Duration::from_secs(u64::from(config.cache_ttl_minutes) * 60))
        } else {
            adapter
        })
    }

    /// Enable forward-lookup caching with the given TTL
    #[must_use]
    pub fn with_cache(mut self, ttl: Duration) -> Self {
        self.cache = Some(
            Cache::builder()
                .max_capacity(CACHE_CAPACITY)
                .time_to_live(ttl)
                .build(),
        );
        self
    }

    fn provider(&self, kind: GeocodeProvider) -> &dyn GeocodingProvider {
        match kind {
            GeocodeProvider::Swiss => self.swiss.as_ref(),
            GeocodeProvider::Generic => self.generic.as_ref(),
        }
    }

    /// One provider call, through the cache for forward lookups
    async fn attempt(
        &self,
        kind: GeocodeProvider,
        lookup: Lookup<'_>,
    ) -> Result<Vec<GeocodeResult>, GeocodingError> {
        let cache_key = match (lookup, &self.cache) {
            (Lookup::Forward(address), Some(_)) => Some((kind, normalize_address(address))),
            _ => None,
        };

        let cached = match (&self.cache, &cache_key) {
            (Some(cache), Some(key)) => cache.get(key).await,
            _ => None,
        };
        if let Some(hit) = cached {
            debug!(provider = %kind, operation = lookup.operation(), "Geocoding cache hit");
            return Ok(hit);
        }

        let started = Instant::now();
        let provider = self.provider(kind);
        let result = match lookup {
            Lookup::Forward(address) => provider.geocode(address).await,
            Lookup::Reverse(point) => provider.reverse_geocode(point).await,
        };
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(results) => {
                debug!(
                    provider = %kind,
                    operation = lookup.operation(),
                    count = results.len(),
                    latency_ms,
                    "Geocoder answered"
                );
                match (&self.cache, cache_key) {
                    (Some(cache), Some(key)) if !results.is_empty() => {
                        cache.insert(key, results.clone()).await;
                    },
                    _ => {},
                }
            },
            Err(e) => warn!(
                provider = %kind,
                operation = lookup.operation(),
                latency_ms,
                error = %e,
                "Geocoder request failed"
            ),
        }

        result
    }

    /// Preferred provider first, alternate once on error or empty result
    async fn lookup_with_fallback(
        &self,
        lookup: Lookup<'_>,
        prefer_swiss: bool,
    ) -> Result<Vec<GeocodeResult>, ApplicationError> {
        let primary = if prefer_swiss {
            GeocodeProvider::Swiss
        } else {
            GeocodeProvider::Generic
        };

        let primary_error = match self.attempt(primary, lookup).await {
            Ok(results) if !results.is_empty() => return Ok(results),
            Ok(_) => None,
            Err(e) => Some(e),
        };

        let alternate = primary.alternate();
        info!(
            operation = lookup.operation(),
            from = %primary,
            to = %alternate,
            primary_failed = primary_error.is_some(),
            "Falling back to alternate geocoder"
        );

        match (self.attempt(alternate, lookup).await, primary_error) {
            (Ok(results), _) => Ok(results),
            // the preferred provider answered; it just had nothing
            (Err(_), None) => Ok(Vec::new()),
            (Err(alternate_error), Some(primary_error)) => Err(ApplicationError::upstream(
                format!("{primary}+{alternate}"),
                format!("{primary}: {primary_error}; {alternate}: {alternate_error}"),
            )),
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn geocode(
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
        self.lookup_with_fallback(Lookup::Forward(address), prefer_swiss)
            .await
    }

    #[instrument(skip(self), fields(point = %point))]
    async fn reverse_geocode(
        &self,
        point: &GeoPoint,
        prefer_swiss: bool,
    ) -> Result<Vec<GeocodeResult>, ApplicationError> {
        self.lookup_with_fallback(Lookup::Reverse(point), prefer_swiss)
            .await
    }

    #[instrument(skip(self), fields(point = %point))]
    async fn find_nearby_pois(
        &self,
        point: &GeoPoint,
        radius_meters: u32,
    ) -> Result<Vec<PointOfInterest>, ApplicationError> {
        let started = Instant::now();
        self.pois
            .find_pois(point, radius_meters)
            .await
            .map_err(|e| {
                warn!(
                    provider = "overpass",
                    latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "POI request failed"
                );
                map_error("overpass", e)
            })
    }

    async fn is_available(&self) -> bool {
        let (swiss, generic) = tokio::join!(self.swiss.is_healthy(), self.generic.is_healthy());
        swiss || generic
    }
}

/// Cache key form of an address: lowercase, single spaces
fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn map_error(provider: &str, e: GeocodingError) -> ApplicationError {
    match e {
        GeocodingError::InvalidQuery(msg) => ApplicationError::InvalidArgument(msg),
        GeocodingError::ConfigurationError(msg) => ApplicationError::Configuration(msg),
        other => ApplicationError::upstream(provider, other.to_string()),
    }
}
