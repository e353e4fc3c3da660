//! Response shapes shared by the geo handlers

use application::ApplicationError;
use domain::{EntityId, EntityKind, GeoPoint, ProximityResult, SearchableEntity, TravelEstimate};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Round a distance to two decimals for presentation
pub fn round_km(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

/// Build a point from optional query parameters
///
/// # Errors
///
/// `InvalidArgument` if either value is missing or not a valid coordinate.
pub fn require_point(
    lat: Option<f64>,
    lng: Option<f64>,
    names: (&str, &str),
) -> Result<GeoPoint, ApiError> {
    let (Some(lat), Some(lng)) = (lat, lng) else {
        return Err(ApiError::InvalidArgument(format!(
            "{} and {} are required",
            names.0, names.1
        )));
    };
    GeoPoint::new(lat, lng).map_err(|e| ApplicationError::from(e).into())
}

/// A catalogue entity as rendered over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDto {
    pub id: EntityId,
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_region_name: Option<String>,
    pub route_count: u32,
}

impl From<SearchableEntity> for EntityDto {
    fn from(entity: SearchableEntity) -> Self {
        Self {
            lat: entity.position.map(|p| p.latitude()),
            lng: entity.position.map(|p| p.longitude()),
            id: entity.id,
            name: entity.name,
            parent_region_name: entity.parent_region_name,
            route_count: entity.route_count,
        }
    }
}

/// One proximity hit; exactly one of `site` / `sector` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site: Option<EntityDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<EntityDto>,
    pub distance_km: f64,
    pub travel_time: TravelEstimate,
}

impl From<ProximityResult> for NearbyEntity {
    fn from(result: ProximityResult) -> Self {
        let kind = result.entity.kind;
        let dto = EntityDto::from(result.entity);
        let (site, sector) = match kind {
            EntityKind::Site => (Some(dto), None),
            EntityKind::Sector => (None, Some(dto)),
        };
        Self {
            site,
            sector,
            distance_km: round_km(result.distance_km),
            travel_time: result.travel_time,
        }
    }
}

/// Proximity query response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyResponse {
    pub results: Vec<NearbyEntity>,
    pub total_found: usize,
}

impl From<Vec<ProximityResult>> for NearbyResponse {
    fn from(results: Vec<ProximityResult>) -> Self {
        let results: Vec<NearbyEntity> = results.into_iter().map(NearbyEntity::from).collect();
        Self {
            total_found: results.len(),
            results,
        }
    }
}

/// Plain list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultsResponse<T> {
    pub results: Vec<T>,
}

impl<T> From<Vec<T>> for ResultsResponse<T> {
    fn from(results: Vec<T>) -> Self {
        Self { results }
    }
}
