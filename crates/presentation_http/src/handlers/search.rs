//! Unified search handler

use application::{SearchBucket, SearchRequest, SearchResponse, SearchScope};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use domain::GeocodeResult;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::dto::{EntityDto, NearbyEntity, require_point};
use crate::{error::ApiError, state::AppState};

/// Query for `/geo/search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    /// `sites`, `sectors`, `addresses` or `all`
    #[serde(rename = "type")]
    pub scope: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    pub limit: Option<usize>,
    pub swiss: Option<bool>,
}

impl SearchQuery {
    fn into_request(self) -> Result<SearchRequest, ApiError> {
        let scope: SearchScope = self.scope.as_deref().unwrap_or_default().parse()?;

        // A half-specified location is a caller mistake, not "no location"
        let origin = match (self.lat, self.lng) {
            (None, None) => None,
            (lat, lng) => Some(require_point(lat, lng, ("lat", "lng"))?),
        };

        Ok(SearchRequest {
            text: self.q,
            origin,
            radius_km: self.radius,
            scope,
            limit: self.limit,
            prefer_swiss: self.swiss.unwrap_or(true),
        })
    }
}

/// Aggregated search buckets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponseBody {
    pub sites: Vec<EntityDto>,
    pub sectors: Vec<EntityDto>,
    pub nearby_sites: Vec<NearbyEntity>,
    pub nearby_sectors: Vec<NearbyEntity>,
    pub addresses: Vec<GeocodeResult>,
    pub total_results: usize,
    pub degraded: Vec<SearchBucket>,
}

impl From<SearchResponse> for SearchResponseBody {
    fn from(response: SearchResponse) -> Self {
        Self {
            sites: response.sites.into_iter().map(EntityDto::from).collect(),
            sectors: response.sectors.into_iter().map(EntityDto::from).collect(),
            nearby_sites: response
                .nearby_sites
                .into_iter()
                .map(NearbyEntity::from)
                .collect(),
            nearby_sectors: response
                .nearby_sectors
                .into_iter()
                .map(NearbyEntity::from)
                .collect(),
            addresses: response.addresses,
            total_results: response.total_results,
            degraded: response.degraded,
        }
    }
}

/// Search sites, sectors and addresses at once
///
/// GET /geo/search?q=&type=&lat=&lng=&radius=&limit=
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponseBody>, ApiError> {
    let Query(query) = query?;
    let response = state.search.search(query.into_request()?).await?;

    if response.is_degraded() {
        info!(degraded = ?response.degraded, "Search answered with degraded buckets");
    }
    Ok(Json(response.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_is_rejected() {
        let query = SearchQuery {
            q: Some("Saillon".to_string()),
            scope: Some("routes".to_string()),
            ..SearchQuery::default()
        };
        assert!(matches!(
            query.into_request(),
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn half_location_is_rejected() {
        let query = SearchQuery {
            lat: Some(46.2),
            ..SearchQuery::default()
        };
        assert!(matches!(
            query.into_request(),
            Err(ApiError::InvalidArgument(_))
        ));
    }

    #[test]
    fn defaults_to_all_buckets_and_swiss_provider() {
        let request = SearchQuery {
            q: Some("Gastlosen".to_string()),
            ..SearchQuery::default()
        }
        .into_request()
        .unwrap();

        assert_eq!(request.scope, SearchScope::All);
        assert!(request.prefer_swiss);
        assert!(request.origin.is_none());
    }
}
