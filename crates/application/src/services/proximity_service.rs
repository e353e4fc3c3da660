//! Proximity search
//!
//! [`find_nearest`] is the ranking algorithm: a linear scan over the supplied
//! candidates, Haversine filter by radius, sort by distance then id, truncate.
//! Catalogue sizes are in the low thousands, so no spatial index is used;
//! an index (grid buckets, k-d tree) would replace the scan inside this
//! function without changing its signature.
//!
//! [`ProximityService`] feeds it from the [`CatalogPort`].

use std::{fmt, sync::Arc};

use domain::geo::{ensure_within_switzerland, estimate_travel, haversine_km};
use domain::{DomainError, EntityId, EntityKind, GeoPoint, ProximityResult, SearchableEntity};
use tracing::{debug, instrument};

use crate::{error::ApplicationError, ports::CatalogPort};

/// Hard upper bound on the number of results any proximity query returns
pub const MAX_PROXIMITY_RESULTS: usize = 200;

/// Rank `candidates` by distance from `origin`
///
/// Entities without a position are skipped. `limit` is capped at
/// [`MAX_PROXIMITY_RESULTS`].
///
/// # Errors
///
/// - `OutOfBounds` if `origin` is outside the Swiss envelope
/// - `InvalidArgument` if `radius_km` is not a positive finite number or `limit` is 0
pub fn find_nearest(
    origin: &GeoPoint,
    radius_km: f64,
    limit: usize,
    candidates: impl IntoIterator<Item = SearchableEntity>,
) -> Result<Vec<ProximityResult>, ApplicationError> {
    ensure_within_switzerland(origin)?;
    validate_radius(radius_km)?;
    let limit = validate_limit(limit)?.min(MAX_PROXIMITY_RESULTS);

    let mut results: Vec<ProximityResult> = candidates
        .into_iter()
        .filter_map(|entity| {
            let position = entity.position?;
            let distance_km = haversine_km(origin, &position);
            (distance_km <= radius_km).then(|| ProximityResult {
                travel_time: estimate_travel(distance_km),
                distance_km,
                entity,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.entity.id.cmp(&b.entity.id))
    });
    results.truncate(limit);

    Ok(results)
}

/// Check that a search radius is usable
///
/// # Errors
///
/// Returns `InvalidArgument` for zero, negative or non-finite values.
pub fn validate_radius(radius_km: f64) -> Result<(), ApplicationError> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(())
    } else {
        Err(ApplicationError::InvalidArgument(format!(
            "radius must be a positive number of kilometers, got {radius_km}"
        )))
    }
}

/// Check that a result limit is usable
///
/// # Errors
///
/// Returns `InvalidArgument` for 0.
pub fn validate_limit(limit: usize) -> Result<usize, ApplicationError> {
    if limit == 0 {
        Err(ApplicationError::InvalidArgument(
            "limit must be greater than 0".to_string(),
        ))
    } else {
        Ok(limit)
    }
}

/// Proximity queries over the live catalogue
pub struct ProximityService {
    catalog: Arc<dyn CatalogPort>,
}

impl fmt::Debug for ProximityService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProximityService").finish_non_exhaustive()
    }
}

impl ProximityService {
    /// Create a new proximity service
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self { catalog }
    }

    /// Nearest entities of one kind around `origin`
    #[instrument(skip(self), fields(origin = %origin))]
    pub async fn nearest(
        &self,
        kind: EntityKind,
        origin: &GeoPoint,
        radius_km: f64,
        limit: usize,
    ) -> Result<Vec<ProximityResult>, ApplicationError> {
        // Reject bad input before touching the catalogue
        ensure_within_switzerland(origin)?;
        validate_radius(radius_km)?;
        validate_limit(limit)?;

        let candidates = self.catalog.list_geolocated_entities(kind).await?;
        let scanned = candidates.len();
        let results = find_nearest(origin, radius_km, limit, candidates)?;

        debug!(%kind, scanned, found = results.len(), "Proximity search complete");
        Ok(results)
    }

    /// Nearest climbing sites
    pub async fn nearest_sites(
        &self,
        origin: &GeoPoint,
        radius_km: f64,
        limit: usize,
    ) -> Result<Vec<ProximityResult>, ApplicationError> {
        self.nearest(EntityKind::Site, origin, radius_km, limit)
            .await
    }

    /// Nearest sectors
    pub async fn nearest_sectors(
        &self,
        origin: &GeoPoint,
        radius_km: f64,
        limit: usize,
    ) -> Result<Vec<ProximityResult>, ApplicationError> {
        self.nearest(EntityKind::Sector, origin, radius_km, limit)
            .await
    }

    /// Sectors around a catalogue site
    ///
    /// # Errors
    ///
    /// `NotFound` if the site does not exist; `InvalidArgument` if the site
    /// has no coordinates.
    #[instrument(skip(self), fields(site_id = %site_id))]
    pub async fn sectors_near_site(
        &self,
        site_id: &EntityId,
        radius_km: f64,
        limit: usize,
    ) -> Result<(SearchableEntity, Vec<ProximityResult>), ApplicationError> {
        let site = self
            .catalog
            .find_by_id(EntityKind::Site, site_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Site", site_id.as_str()))?;

        let origin = site.position.ok_or_else(|| {
            ApplicationError::InvalidArgument(format!("Site {site_id} has no coordinates"))
        })?;

        let sectors = self
            .nearest(EntityKind::Sector, &origin, radius_km, limit)
            .await?;
        Ok((site, sectors))
    }
}
