//! Cached catalogue adapter - Serves CatalogPort from a TTL-refreshed snapshot
//!
//! The snapshot is loaded from the inner source on first use and again once
//! the TTL expires. Queries never write to it.

use std::{fmt, sync::Arc, time::Duration};

use application::{error::ApplicationError, ports::CatalogPort};
use async_trait::async_trait;
use domain::{EntityId, EntityKind, SearchableEntity};
use moka::future::Cache;
use tracing::{debug, instrument};

use super::catalog_snapshot::{CatalogSnapshot, SnapshotSource};

/// Catalogue port backed by a cached snapshot of `S`
pub struct CachedCatalogAdapter<S> {
    source: S,
    cache: Cache<(), Arc<CatalogSnapshot>>,
}

impl<S> fmt::Debug for CachedCatalogAdapter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedCatalogAdapter")
            .field("cached", &(self.cache.entry_count() > 0))
            .finish_non_exhaustive()
    }
}

impl<S: SnapshotSource> CachedCatalogAdapter<S> {
    /// Wrap `source`, refreshing the snapshot every `ttl`
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    /// Current snapshot, loading it if absent or expired
    ///
    /// Concurrent callers on a cold cache share one load. A failed load is
    /// returned to every waiter and not cached.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, ApplicationError> {
        self.cache
            .try_get_with((), async {
                debug!("Loading catalogue snapshot");
                self.source.load_snapshot().await.map(Arc::new)
            })
            .await
            .map_err(Arc::unwrap_or_clone)
    }

    /// Drop the cached snapshot so the next query reloads it
    pub async fn invalidate(&self) {
        self.cache.invalidate(&()).await;
    }
}

#[async_trait]
impl<S: SnapshotSource> CatalogPort for CachedCatalogAdapter<S> {
    async fn list_geolocated_entities(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<SearchableEntity>, ApplicationError> {
        Ok(self.snapshot().await?.geolocated(kind))
    }

    async fn search_by_name(
        &self,
        term: &str,
        kind: Option<EntityKind>,
        limit: usize,
    ) -> Result<Vec<SearchableEntity>, ApplicationError> {
        Ok(self.snapshot().await?.search_by_name(term, kind, limit))
    }

    async fn find_by_id(
        &self,
        kind: EntityKind,
        id: &EntityId,
    ) -> Result<Option<SearchableEntity>, ApplicationError> {
        Ok(self.snapshot().await?.find(kind, id).cloned())
    }

    async fn is_available(&self) -> bool {
        self.snapshot().await.is_ok()
    }
}
