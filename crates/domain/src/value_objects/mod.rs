//! Value Objects - Immutable, identity-less domain primitives

mod entity_id;
mod geo_point;
mod swiss_grid_point;

pub use entity_id::EntityId;
pub use geo_point::GeoPoint;
pub use swiss_grid_point::SwissGridPoint;
