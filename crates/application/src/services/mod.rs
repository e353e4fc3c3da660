//! Application services - Use case implementations

mod geo_service;
mod proximity_service;
mod search_service;

pub use geo_service::{DEFAULT_POI_RADIUS_M, DistanceEstimate, GeoService, MAX_POI_RADIUS_M};
pub use proximity_service::{
    MAX_PROXIMITY_RESULTS, ProximityService, find_nearest, validate_limit, validate_radius,
};
pub use search_service::{
    SearchBucket, SearchRequest, SearchResponse, SearchScope, SearchService, SearchSettings,
};
