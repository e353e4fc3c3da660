//! Route definitions

use axum::{Router, routing::get};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Proximity
        .route("/geo/nearest-sites", get(handlers::geo::nearest_sites))
        .route("/geo/nearest-sectors", get(handlers::geo::nearest_sectors))
        .route(
            "/geo/sites/{id}/nearby-sectors",
            get(handlers::geo::sectors_near_site),
        )
        // Geocoding
        .route("/geo/geocode", get(handlers::geo::geocode))
        .route("/geo/reverse-geocode", get(handlers::geo::reverse_geocode))
        .route("/geo/nearby-pois", get(handlers::geo::nearby_pois))
        // Coordinate utilities
        .route("/geo/to-swiss-grid", get(handlers::geo::to_swiss_grid))
        .route("/geo/from-swiss-grid", get(handlers::geo::from_swiss_grid))
        .route("/geo/distance", get(handlers::geo::distance))
        // Unified search
        .route("/geo/search", get(handlers::search::search))
        .with_state(state)
}
