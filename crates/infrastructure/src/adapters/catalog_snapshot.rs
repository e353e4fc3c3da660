//! In-memory catalogue snapshot and its JSON wire format
//!
//! ```json
//! {
//!   "sites":   [{"id": 1, "name": "Gastlosen", "latitude": 46.58, "longitude": 7.28,
//!                "region": "Fribourg", "route_count": 412}],
//!   "sectors": [{"id": "s-7", "name": "Chline Turm", "lat": 46.58, "lng": 7.27}]
//! }
//! ```
//!
//! Ids may be numbers or strings. Records with missing or invalid coordinates
//! are kept without a position.

use application::error::ApplicationError;
use async_trait::async_trait;
use domain::{EntityId, EntityKind, GeoPoint, SearchableEntity};
use serde::Deserialize;

/// Something that can produce a fresh catalogue snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Load the current snapshot
    async fn load_snapshot(&self) -> Result<CatalogSnapshot, ApplicationError>;
}

/// Read-only view of all sites and sectors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    sites: Vec<SearchableEntity>,
    sectors: Vec<SearchableEntity>,
}

impl CatalogSnapshot {
    /// Build a snapshot from entity lists; entities are filed by their kind
    pub fn new(entities: impl IntoIterator<Item = SearchableEntity>) -> Self {
        let (sites, sectors) = entities
            .into_iter()
            .partition(|e| e.kind == EntityKind::Site);
        Self { sites, sectors }
    }

    /// Parse the JSON catalogue format
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, ApplicationError> {
        let file: CatalogFile = serde_json::from_str(json)
            .map_err(|e| ApplicationError::Internal(format!("Malformed catalogue snapshot: {e}")))?;

        Ok(Self {
            sites: file
                .sites
                .into_iter()
                .map(|r| r.into_entity(EntityKind::Site))
                .collect(),
            sectors: file
                .sectors
                .into_iter()
                .map(|r| r.into_entity(EntityKind::Sector))
                .collect(),
        })
    }

    /// All entities of one kind
    pub fn entities(&self, kind: EntityKind) -> &[SearchableEntity] {
        match kind {
            EntityKind::Site => &self.sites,
            EntityKind::Sector => &self.sectors,
        }
    }

    /// Entities of one kind that have a position
    pub fn geolocated(&self, kind: EntityKind) -> Vec<SearchableEntity> {
        self.entities(kind)
            .iter()
            .filter(|e| e.has_position())
            .cloned()
            .collect()
    }

    /// Look up one entity
    pub fn find(&self, kind: EntityKind, id: &EntityId) -> Option<&SearchableEntity> {
        self.entities(kind).iter().find(|e| &e.id == id)
    }

    /// Case-insensitive substring search over names
    ///
    /// Exact matches rank before prefix matches, which rank before other
    /// substring matches; then by name.
    pub fn search_by_name(
        &self,
        term: &str,
        kind: Option<EntityKind>,
        limit: usize,
    ) -> Vec<SearchableEntity> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut hits: Vec<(u8, &SearchableEntity)> = self
            .sites
            .iter()
            .chain(&self.sectors)
            .filter(|entity| kind.is_none_or(|kind| entity.kind == kind))
            .filter_map(|entity| {
                let name = entity.name.to_lowercase();
                let rank = if name == needle {
                    0
                } else if name.starts_with(&needle) {
                    1
                } else if name.contains(&needle) {
                    2
                } else {
                    return None;
                };
                Some((rank, entity))
            })
            .collect();

        hits.sort_by(|(ra, a), (rb, b)| {
            ra.cmp(rb)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.kind.cmp(&b.kind))
                .then_with(|| a.id.cmp(&b.id))
        });
        hits.into_iter()
            .take(limit)
            .map(|(_, entity)| entity.clone())
            .collect()
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.sites.len() + self.sectors.len()
    }

    /// Check if the snapshot holds no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    sites: Vec<EntityRecord>,
    #[serde(default)]
    sectors: Vec<EntityRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl From<RawId> for EntityId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Number(n) => Self::from(n),
            RawId::Text(s) => Self::from(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EntityRecord {
    id: RawId,
    name: String,
    #[serde(default, alias = "lat")]
    latitude: Option<f64>,
    #[serde(default, alias = "lng", alias = "lon")]
    longitude: Option<f64>,
    #[serde(default, alias = "region")]
    parent_region_name: Option<String>,
    #[serde(default)]
    route_count: u32,
}

impl EntityRecord {
    fn into_entity(self, kind: EntityKind) -> SearchableEntity {
        let position = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon).ok(),
            _ => None,
        };

        let mut entity = match position {
            Some(position) => SearchableEntity::new(self.id, kind, self.name, position),
            None => SearchableEntity::without_position(self.id, kind, self.name),
        };
        if let Some(region) = self.parent_region_name {
            entity = entity.with_parent_region(region);
        }
        entity.with_route_count(self.route_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "sites": [
            {"id": 1, "name": "Gastlosen", "latitude": 46.58, "longitude": 7.28, "region": "Fribourg", "route_count": 412},
            {"id": "2", "name": "Sion Tourbillon", "lat": 46.2365, "lng": 7.3656},
            {"id": 3, "name": "Gastlosen Süd", "latitude": 146.0, "longitude": 7.28},
            {"id": 4, "name": "Lost Crag"}
        ],
        "sectors": [
            {"id": 10, "name": "Chline Turm", "latitude": 46.581, "longitude": 7.279}
        ]
    }"#;

    #[test]
    fn parses_mixed_ids_and_coordinate_aliases() {
        let snapshot = CatalogSnapshot::from_json(SNAPSHOT).unwrap();

        assert_eq!(snapshot.len(), 5);
        let gastlosen = snapshot.find(EntityKind::Site, &EntityId::from(1_u64)).unwrap();
        assert_eq!(gastlosen.parent_region_name.as_deref(), Some("Fribourg"));
        assert_eq!(gastlosen.route_count, 412);
        assert!(snapshot.find(EntityKind::Site, &EntityId::from("2")).unwrap().has_position());
    }

    #[test]
    fn invalid_or_missing_coordinates_drop_position_only() {
        let snapshot = CatalogSnapshot::from_json(SNAPSHOT).unwrap();

        let invalid = snapshot.find(EntityKind::Site, &EntityId::from(3_u64)).unwrap();
        assert!(!invalid.has_position());
        let geolocated = snapshot.geolocated(EntityKind::Site);
        assert_eq!(geolocated.len(), 2);
    }

    #[test]
    fn find_respects_kind() {
        let snapshot = CatalogSnapshot::from_json(SNAPSHOT).unwrap();
        assert!(snapshot.find(EntityKind::Sector, &EntityId::from(1_u64)).is_none());
        assert!(snapshot.find(EntityKind::Sector, &EntityId::from(10_u64)).is_some());
    }

    #[test]
    fn name_search_ranks_exact_then_prefix_then_substring() {
        let snapshot = CatalogSnapshot::new(vec![
            SearchableEntity::without_position(1_u64, EntityKind::Site, "Am Turm"),
            SearchableEntity::without_position(2_u64, EntityKind::Sector, "Turm"),
            SearchableEntity::without_position(3_u64, EntityKind::Site, "Turmwand"),
            SearchableEntity::without_position(4_u64, EntityKind::Site, "Gastlosen"),
        ]);

        let names: Vec<String> = snapshot
            .search_by_name("TURM", None, 10)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Turm", "Turmwand", "Am Turm"]);

        assert_eq!(snapshot.search_by_name("turm", None, 1).len(), 1);
        assert!(snapshot.search_by_name("  ", None, 10).is_empty());

        let sites: Vec<String> = snapshot
            .search_by_name("turm", Some(EntityKind::Site), 10)
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(sites, vec!["Turmwand", "Am Turm"]);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            CatalogSnapshot::from_json("{\"sites\": 3}"),
            Err(ApplicationError::Internal(_))
        ));
    }
}
