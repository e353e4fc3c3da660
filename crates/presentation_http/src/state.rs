//! Application state shared across handlers

use std::{fmt, sync::Arc};

use application::{
    GeoService, ProximityService, SearchService, SearchSettings,
    ports::{CatalogPort, GeocodingPort},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Proximity queries over the catalogue
    pub proximity: Arc<ProximityService>,
    /// Geocoding and coordinate utilities
    pub geo: Arc<GeoService>,
    /// Unified search aggregator
    pub search: Arc<SearchService>,
    /// Catalogue, for readiness checks
    pub catalog: Arc<dyn CatalogPort>,
    /// Geocoder, for readiness checks
    pub geocoder: Arc<dyn GeocodingPort>,
}

impl AppState {
    /// Wire the services over the given ports
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        geocoder: Arc<dyn GeocodingPort>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            proximity: Arc::new(ProximityService::new(Arc::clone(&catalog))),
            geo: Arc::new(GeoService::new(Arc::clone(&geocoder))),
            search: Arc::new(SearchService::new(
                Arc::clone(&catalog),
                Arc::clone(&geocoder),
                settings,
            )),
            catalog,
            geocoder,
        }
    }

    /// Search tunables, also used for proximity defaults
    pub fn settings(&self) -> &SearchSettings {
        self.search.settings()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("settings", self.settings())
            .finish_non_exhaustive()
    }
}
