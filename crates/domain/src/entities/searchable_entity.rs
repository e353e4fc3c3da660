//! Catalogue entity as seen by the geo engine

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{EntityId, GeoPoint};

/// Kind of catalogue entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A climbing site (crag, area)
    Site,
    /// A sector inside a site
    Sector,
}

impl EntityKind {
    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Site => "Site",
            Self::Sector => "Sector",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for EntityKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "site" | "sites" => Ok(Self::Site),
            "sector" | "sectors" => Ok(Self::Sector),
            other => Err(DomainError::ValidationError(format!(
                "Unknown entity kind: {other}"
            ))),
        }
    }
}

/// A catalogue site or sector, read-only from the engine's perspective
///
/// `parent_region_name` and `route_count` are carried for display and never
/// take part in comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchableEntity {
    /// Catalogue identifier
    pub id: EntityId,
    /// Site or sector
    pub kind: EntityKind,
    /// Display name
    pub name: String,
    /// Position, if the catalogue has one for this record
    pub position: Option<GeoPoint>,
    /// Name of the enclosing region (display only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_region_name: Option<String>,
    /// Number of routes (display only)
    #[serde(default)]
    pub route_count: u32,
}

impl SearchableEntity {
    /// Create a positioned entity
    pub fn new(
        id: impl Into<EntityId>,
        kind: EntityKind,
        name: impl Into<String>,
        position: GeoPoint,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            position: Some(position),
            parent_region_name: None,
            route_count: 0,
        }
    }

    /// Create an entity the catalogue has no coordinates for
    pub fn without_position(
        id: impl Into<EntityId>,
        kind: EntityKind,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            position: None,
            parent_region_name: None,
            route_count: 0,
        }
    }

    /// Set the parent region name
    #[must_use]
    pub fn with_parent_region(mut self, region: impl Into<String>) -> Self {
        self.parent_region_name = Some(region.into());
        self
    }

    /// Set the route count
    #[must_use]
    pub const fn with_route_count(mut self, count: u32) -> Self {
        self.route_count = count;
        self
    }

    /// Whether the entity can take part in distance queries
    #[must_use]
    pub const fn has_position(&self) -> bool {
        self.position.is_some()
    }
}
