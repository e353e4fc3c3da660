//! Geo query handlers
//!
//! Thin adapters from query strings to the application services. Missing or
//! malformed parameters are `invalid_argument`; coordinates outside
//! Switzerland are `out_of_bounds`.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use domain::{EntityId, GeoPoint, GeocodeResult, PointOfInterest, SwissGridPoint, TravelEstimate};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::dto::{EntityDto, NearbyResponse, ResultsResponse, require_point, round_km};
use crate::{error::ApiError, state::AppState};

const COORDS: (&str, &str) = ("lat", "lng");

/// Query for proximity endpoints
#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Radius in kilometers
    pub radius: Option<f64>,
    pub limit: Option<usize>,
}

impl NearestQuery {
    fn resolve(&self, state: &AppState) -> Result<(GeoPoint, f64, usize), ApiError> {
        let origin = require_point(self.lat, self.lng, COORDS)?;
        let (radius, limit) = radius_and_limit(state, self.radius, self.limit);
        Ok((origin, radius, limit))
    }
}

fn radius_and_limit(state: &AppState, radius: Option<f64>, limit: Option<usize>) -> (f64, usize) {
    let settings = state.settings();
    (
        radius.unwrap_or(settings.default_radius_km),
        limit
            .unwrap_or(settings.default_limit)
            .min(settings.max_limit),
    )
}

/// Nearest climbing sites
///
/// GET /geo/nearest-sites?lat=&lng=&radius=&limit=
#[instrument(skip(state))]
pub async fn nearest_sites(
    State(state): State<AppState>,
    query: Result<Query<NearestQuery>, QueryRejection>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let Query(query) = query?;
    let (origin, radius, limit) = query.resolve(&state)?;
    let results = state.proximity.nearest_sites(&origin, radius, limit).await?;
    Ok(Json(results.into()))
}

/// Nearest sectors
///
/// GET /geo/nearest-sectors?lat=&lng=&radius=&limit=
#[instrument(skip(state))]
pub async fn nearest_sectors(
    State(state): State<AppState>,
    query: Result<Query<NearestQuery>, QueryRejection>,
) -> Result<Json<NearbyResponse>, ApiError> {
    let Query(query) = query?;
    let (origin, radius, limit) = query.resolve(&state)?;
    let results = state
        .proximity
        .nearest_sectors(&origin, radius, limit)
        .await?;
    Ok(Json(results.into()))
}

/// Query for sectors around a site
#[derive(Debug, Deserialize)]
pub struct SiteSectorsQuery {
    pub radius: Option<f64>,
    pub limit: Option<usize>,
}

/// Sectors around a site
#[derive(Debug, Serialize, Deserialize)]
pub struct SiteSectorsResponse {
    pub site: EntityDto,
    #[serde(flatten)]
    pub nearby: NearbyResponse,
}

/// Sectors around a catalogue site
///
/// GET /geo/sites/{id}/nearby-sectors?radius=&limit=
#[instrument(skip(state))]
pub async fn sectors_near_site(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<SiteSectorsQuery>, QueryRejection>,
) -> Result<Json<SiteSectorsResponse>, ApiError> {
    let Query(query) = query?;
    let (radius, limit) = radius_and_limit(&state, query.radius, query.limit);
    let (site, sectors) = state
        .proximity
        .sectors_near_site(&EntityId::from(id), radius, limit)
        .await?;

    Ok(Json(SiteSectorsResponse {
        site: site.into(),
        nearby: sectors.into(),
    }))
}

const fn default_swiss() -> bool {
    true
}

/// Query for forward geocoding
#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub address: Option<String>,
    #[serde(default = "default_swiss")]
    pub swiss: bool,
}

/// Forward geocode an address
///
/// GET /geo/geocode?address=&swiss=
#[instrument(skip(state))]
pub async fn geocode(
    State(state): State<AppState>,
    query: Result<Query<GeocodeQuery>, QueryRejection>,
) -> Result<Json<ResultsResponse<GeocodeResult>>, ApiError> {
    let Query(query) = query?;
    let address = query.address.unwrap_or_default();
    let results = state.geo.geocode(&address, query.swiss).await?;
    Ok(Json(results.into()))
}

/// Query for reverse geocoding
#[derive(Debug, Deserialize)]
pub struct ReverseGeocodeQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default = "default_swiss")]
    pub swiss: bool,
}

/// Reverse geocode a position
///
/// GET /geo/reverse-geocode?lat=&lng=&swiss=
#[instrument(skip(state))]
pub async fn reverse_geocode(
    State(state): State<AppState>,
    query: Result<Query<ReverseGeocodeQuery>, QueryRejection>,
) -> Result<Json<ResultsResponse<GeocodeResult>>, ApiError> {
    let Query(query) = query?;
    let point = require_point(query.lat, query.lng, COORDS)?;
    let results = state.geo.reverse_geocode(&point, query.swiss).await?;
    Ok(Json(results.into()))
}

/// Query for POI search
#[derive(Debug, Deserialize)]
pub struct PoiQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Radius in meters
    pub radius: Option<u32>,
}

/// Points of interest around a position
///
/// GET /geo/nearby-pois?lat=&lng=&radius=
#[instrument(skip(state))]
pub async fn nearby_pois(
    State(state): State<AppState>,
    query: Result<Query<PoiQuery>, QueryRejection>,
) -> Result<Json<ResultsResponse<PointOfInterest>>, ApiError> {
    let Query(query) = query?;
    let point = require_point(query.lat, query.lng, COORDS)?;
    let results = state.geo.nearby_pois(&point, query.radius).await?;
    Ok(Json(results.into()))
}

/// Query carrying one WGS84 position
#[derive(Debug, Deserialize)]
pub struct PointQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Project a WGS84 position onto LV95
///
/// GET /geo/to-swiss-grid?lat=&lng=
pub async fn to_swiss_grid(
    State(state): State<AppState>,
    query: Result<Query<PointQuery>, QueryRejection>,
) -> Result<Json<SwissGridPoint>, ApiError> {
    let Query(query) = query?;
    let point = require_point(query.lat, query.lng, COORDS)?;
    Ok(Json(state.geo.to_swiss_grid(&point)?))
}

/// Query carrying one LV95 position
#[derive(Debug, Deserialize)]
pub struct GridQuery {
    pub east: Option<f64>,
    pub north: Option<f64>,
}

/// WGS84 position in HTTP form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Convert LV95 coordinates back to WGS84
///
/// GET /geo/from-swiss-grid?east=&north=
pub async fn from_swiss_grid(
    State(state): State<AppState>,
    query: Result<Query<GridQuery>, QueryRejection>,
) -> Result<Json<LatLng>, ApiError> {
    let Query(query) = query?;
    let (Some(east), Some(north)) = (query.east, query.north) else {
        return Err(ApiError::InvalidArgument(
            "east and north are required".to_string(),
        ));
    };
    let point = state.geo.from_swiss_grid(east, north)?;
    Ok(Json(LatLng {
        lat: point.latitude(),
        lng: point.longitude(),
    }))
}

/// Query carrying two WGS84 positions
#[derive(Debug, Deserialize)]
pub struct DistanceQuery {
    pub lat1: Option<f64>,
    pub lng1: Option<f64>,
    pub lat2: Option<f64>,
    pub lng2: Option<f64>,
}

/// Distance response
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DistanceResponse {
    pub distance_km: f64,
    pub travel_time: TravelEstimate,
}

/// Distance and travel estimate between two positions
///
/// GET /geo/distance?lat1=&lng1=&lat2=&lng2=
pub async fn distance(
    State(state): State<AppState>,
    query: Result<Query<DistanceQuery>, QueryRejection>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let Query(query) = query?;
    let from = require_point(query.lat1, query.lng1, ("lat1", "lng1"))?;
    let to = require_point(query.lat2, query.lng2, ("lat2", "lng2"))?;
    let estimate = state.geo.distance(&from, &to)?;

    Ok(Json(DistanceResponse {
        distance_km: round_km(estimate.distance_km),
        travel_time: estimate.travel_time,
    }))
}
