//! Proximity query results

use serde::{Deserialize, Serialize};

use super::SearchableEntity;

/// Coarse travel-time estimate derived from straight-line distance
///
/// Not a routed ETA. `estimated` is always `true` so that every serialized
/// response labels the figures as approximations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelEstimate {
    /// Minutes by car at an average road speed
    pub driving_minutes: u32,
    /// Minutes on foot at an average walking speed
    pub walking_minutes: u32,
    /// Always true; the values are heuristics
    pub estimated: bool,
}

impl TravelEstimate {
    /// Build an estimate from precomputed minutes
    #[must_use]
    pub const fn new(driving_minutes: u32, walking_minutes: u32) -> Self {
        Self {
            driving_minutes,
            walking_minutes,
            estimated: true,
        }
    }
}

/// One ranked hit of a proximity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProximityResult {
    /// The catalogue entity
    pub entity: SearchableEntity,
    /// Great-circle distance from the query origin (>= 0)
    pub distance_km: f64,
    /// Travel-time estimate for `distance_km`
    pub travel_time: TravelEstimate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_is_always_labelled() {
        let estimate = TravelEstimate::new(12, 150);
        assert!(estimate.estimated);
        let json = serde_json::to_string(&estimate).unwrap();
        assert!(json.contains("\"estimated\":true"));
    }
}
