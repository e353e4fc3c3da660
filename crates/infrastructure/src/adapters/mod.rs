//! Adapters implementing the application ports

mod cached_catalog_adapter;
mod catalog_snapshot;
mod geocoding_adapter;
mod json_catalog_adapter;

pub use cached_catalog_adapter::CachedCatalogAdapter;
pub use catalog_snapshot::{CatalogSnapshot, SnapshotSource};
pub use geocoding_adapter::GeocodingAdapter;
pub use json_catalog_adapter::JsonCatalogAdapter;
