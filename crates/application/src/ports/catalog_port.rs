//! Catalogue provider port
//!
//! The climbing-site catalogue is owned by an external store. The engine only
//! reads from it: bulk listing of positioned entities, name search, and
//! single-entity lookup.

use async_trait::async_trait;
use domain::{EntityId, EntityKind, SearchableEntity};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for read-only catalogue access
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// All entities of `kind` that the catalogue has coordinates for
    ///
    /// Implementations may still return records with `position: None`;
    /// consumers skip them.
    async fn list_geolocated_entities(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<SearchableEntity>, ApplicationError>;

    /// Case-insensitive name search
    ///
    /// `kind` restricts hits to sites or sectors; `None` searches both.
    async fn search_by_name(
        &self,
        term: &str,
        kind: Option<EntityKind>,
        limit: usize,
    ) -> Result<Vec<SearchableEntity>, ApplicationError>;

    /// Look up one entity
    async fn find_by_id(
        &self,
        kind: EntityKind,
        id: &EntityId,
    ) -> Result<Option<SearchableEntity>, ApplicationError>;

    /// Check if the catalogue can currently be read
    async fn is_available(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn CatalogPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn CatalogPort>();
    }
}
