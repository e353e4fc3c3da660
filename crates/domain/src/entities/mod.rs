//! Domain entities - catalogue records and per-request query results

mod geocode;
mod proximity;
mod searchable_entity;

pub use geocode::{GeocodeProvider, GeocodeResult, PointOfInterest};
pub use proximity::{ProximityResult, TravelEstimate};
pub use searchable_entity::{EntityKind, SearchableEntity};
