//! Unified search by text and/or location
//!
//! Runs catalogue text search, nearby-site and nearby-sector proximity search
//! and address lookup concurrently, each under its own timeout, and returns
//! them as separate buckets. A failed or timed-out branch leaves its bucket
//! empty and is listed in [`SearchResponse::degraded`]; it never fails the
//! whole request.

use std::{
    fmt,
    future::Future,
    str::FromStr,
    sync::Arc,
    time::{Duration, Instant},
};

use domain::geo::ensure_within_switzerland;
use domain::{EntityKind, GeoPoint, GeocodeResult, ProximityResult, SearchableEntity};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::proximity_service::{
    MAX_PROXIMITY_RESULTS, ProximityService, validate_limit, validate_radius,
};
use crate::{
    error::ApplicationError,
    ports::{CatalogPort, GeocodingPort},
};

/// Which buckets a search should fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Sites,
    Sectors,
    Addresses,
    #[default]
    All,
}

impl SearchScope {
    const fn includes_sites(self) -> bool {
        matches!(self, Self::Sites | Self::All)
    }

    const fn includes_sectors(self) -> bool {
        matches!(self, Self::Sectors | Self::All)
    }

    const fn includes_addresses(self) -> bool {
        matches!(self, Self::Addresses | Self::All)
    }
}

impl FromStr for SearchScope {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sites" => Ok(Self::Sites),
            "sectors" => Ok(Self::Sectors),
            "addresses" => Ok(Self::Addresses),
            "all" | "" => Ok(Self::All),
            other => Err(ApplicationError::InvalidArgument(format!(
                "unknown search type '{other}', expected sites, sectors, addresses or all"
            ))),
        }
    }
}

/// Named result bucket of a [`SearchResponse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBucket {
    Sites,
    Sectors,
    NearbySites,
    NearbySectors,
    Addresses,
}

impl SearchBucket {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Sites => "sites",
            Self::Sectors => "sectors",
            Self::NearbySites => "nearby_sites",
            Self::NearbySectors => "nearby_sectors",
            Self::Addresses => "addresses",
        }
    }
}

/// A unified search query
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Free-text term matched against catalogue names and geocoded as an address
    pub text: Option<String>,
    /// Centre of the proximity search
    pub origin: Option<GeoPoint>,
    /// Proximity radius; falls back to the configured default
    pub radius_km: Option<f64>,
    pub scope: SearchScope,
    /// Per-bucket limit; falls back to the configured default
    pub limit: Option<usize>,
    pub prefer_swiss: bool,
}

impl SearchRequest {
    /// Text-only search across all buckets
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Location-only search across all buckets
    pub fn near(origin: GeoPoint, radius_km: f64) -> Self {
        Self {
            origin: Some(origin),
            radius_km: Some(radius_km),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_scope(mut self, scope: SearchScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn search_term(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            text: None,
            origin: None,
            radius_km: None,
            scope: SearchScope::All,
            limit: None,
            prefer_swiss: true,
        }
    }
}

/// Aggregated search result
///
/// Buckets are independent; no de-duplication or cross-bucket ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResponse {
    pub sites: Vec<SearchableEntity>,
    pub sectors: Vec<SearchableEntity>,
    pub nearby_sites: Vec<ProximityResult>,
    pub nearby_sectors: Vec<ProximityResult>,
    pub addresses: Vec<GeocodeResult>,
    pub total_results: usize,
    /// Buckets emptied by an upstream failure or timeout
    pub degraded: Vec<SearchBucket>,
}

impl SearchResponse {
    /// Check if any bucket was emptied by a failure
    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// Tunables for [`SearchService`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSettings {
    /// Upper bound for each concurrent branch
    pub branch_timeout: Duration,
    pub default_radius_km: f64,
    pub default_limit: usize,
    /// Hard cap applied to caller-supplied limits
    pub max_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            branch_timeout: Duration::from_millis(8000),
            default_radius_km: 25.0,
            default_limit: 20,
            max_limit: MAX_PROXIMITY_RESULTS,
        }
    }
}

/// Search aggregator consumed by the HTTP layer
pub struct SearchService {
    catalog: Arc<dyn CatalogPort>,
    geocoder: Arc<dyn GeocodingPort>,
    proximity: ProximityService,
    settings: SearchSettings,
}

impl fmt::Debug for SearchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SearchService {
    /// Create a new search service
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        geocoder: Arc<dyn GeocodingPort>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            proximity: ProximityService::new(Arc::clone(&catalog)),
            catalog,
            geocoder,
            settings,
        }
    }

    /// Current settings
    pub const fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Run a unified search
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if neither text nor origin is given, or radius/limit are invalid
    /// - `OutOfBounds` if the origin is outside Switzerland
    ///
    /// Branch failures never surface as errors.
    #[instrument(skip(self, request), fields(scope = ?request.scope, has_origin = request.origin.is_some()))]
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse, ApplicationError> {
        let term = request.search_term();
        if term.is_none() && request.origin.is_none() {
            return Err(ApplicationError::InvalidArgument(
                "provide a search term or a location".to_string(),
            ));
        }

        if let Some(origin) = &request.origin {
            ensure_within_switzerland(origin)?;
        }
        let radius_km = request.radius_km.unwrap_or(self.settings.default_radius_km);
        validate_radius(radius_km)?;
        let limit = validate_limit(request.limit.unwrap_or(self.settings.default_limit))?
            .min(self.settings.max_limit);

        let scope = request.scope;
        let origin = request.origin;

        let text_sites_branch = async {
            match term {
                Some(term) if scope.includes_sites() => {
                    self.catalog
                        .search_by_name(term, Some(EntityKind::Site), limit)
                        .await
                },
                _ => Ok(Vec::new()),
            }
        };

        let text_sectors_branch = async {
            match term {
                Some(term) if scope.includes_sectors() => {
                    self.catalog
                        .search_by_name(term, Some(EntityKind::Sector), limit)
                        .await
                },
                _ => Ok(Vec::new()),
            }
        };

        let sites_branch = async {
            match origin {
                Some(origin) if scope.includes_sites() => {
                    self.proximity.nearest_sites(&origin, radius_km, limit).await
                },
                _ => Ok(Vec::new()),
            }
        };

        let sectors_branch = async {
            match origin {
                Some(origin) if scope.includes_sectors() => {
                    self.proximity
                        .nearest_sectors(&origin, radius_km, limit)
                        .await
                },
                _ => Ok(Vec::new()),
            }
        };

        let address_branch = async {
            if !scope.includes_addresses() {
                return Ok(Vec::new());
            }
            match (term, origin) {
                (Some(term), _) => self.geocoder.geocode(term, request.prefer_swiss).await,
                (None, Some(origin)) => {
                    self.geocoder
                        .reverse_geocode(&origin, request.prefer_swiss)
                        .await
                },
                (None, None) => Ok(Vec::new()),
            }
        };

        let (sites, sectors, nearby_sites, nearby_sectors, addresses) = tokio::join!(
            self.guarded(SearchBucket::Sites.as_str(), text_sites_branch),
            self.guarded(SearchBucket::Sectors.as_str(), text_sectors_branch),
            self.guarded(SearchBucket::NearbySites.as_str(), sites_branch),
            self.guarded(SearchBucket::NearbySectors.as_str(), sectors_branch),
            self.guarded(SearchBucket::Addresses.as_str(), address_branch),
        );

        let mut response = SearchResponse::default();

        response.sites = fill(sites, SearchBucket::Sites, &mut response.degraded);
        response.sectors = fill(sectors, SearchBucket::Sectors, &mut response.degraded);
        response.nearby_sites =
            fill(nearby_sites, SearchBucket::NearbySites, &mut response.degraded);
        response.nearby_sectors =
            fill(nearby_sectors, SearchBucket::NearbySectors, &mut response.degraded);
        response.addresses = fill(addresses, SearchBucket::Addresses, &mut response.degraded);

        response.total_results = response.sites.len()
            + response.sectors.len()
            + response.nearby_sites.len()
            + response.nearby_sectors.len()
            + response.addresses.len();

        debug!(
            total = response.total_results,
            degraded = response.degraded.len(),
            "Search complete"
        );
        Ok(response)
    }

    /// Run one branch under the branch timeout; `None` means degraded
    async fn guarded<T, F>(&self, branch: &'static str, fut: F) -> Option<Vec<T>>
    where
        F: Future<Output = Result<Vec<T>, ApplicationError>>,
    {
        let started = Instant::now();
        match tokio::time::timeout(self.settings.branch_timeout, fut).await {
            Ok(Ok(items)) => Some(items),
            Ok(Err(e)) => {
                warn!(
                    branch,
                    error = %e,
                    latency_ms = elapsed_ms(started),
                    "Search branch failed"
                );
                None
            },
            Err(_) => {
                warn!(
                    branch,
                    latency_ms = elapsed_ms(started),
                    "Search branch timed out"
                );
                None
            },
        }
    }
}

fn fill<T>(outcome: Option<Vec<T>>, bucket: SearchBucket, degraded: &mut Vec<SearchBucket>) -> Vec<T> {
    outcome.unwrap_or_else(|| {
        degraded.push(bucket);
        Vec::new()
    })
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
