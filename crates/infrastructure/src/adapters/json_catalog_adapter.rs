//! JSON catalogue adapter - Implements CatalogPort over a snapshot file
//!
//! The file is re-read on every call; wrap the adapter in
//! [`CachedCatalogAdapter`](super::CachedCatalogAdapter) to serve queries from
//! a TTL-refreshed snapshot instead.

use std::path::{Path, PathBuf};

use application::{error::ApplicationError, ports::CatalogPort};
use async_trait::async_trait;
use domain::{EntityId, EntityKind, SearchableEntity};
use tracing::{debug, instrument, warn};

use super::catalog_snapshot::{CatalogSnapshot, SnapshotSource};

/// Catalogue backed by a JSON snapshot on disk
#[derive(Debug, Clone)]
pub struct JsonCatalogAdapter {
    path: PathBuf,
}

impl JsonCatalogAdapter {
    /// Create an adapter for the snapshot at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot file location
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotSource for JsonCatalogAdapter {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_snapshot(&self) -> Result<CatalogSnapshot, ApplicationError> {
        let json = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            warn!(error = %e, "Failed to read catalogue snapshot");
            ApplicationError::upstream("catalog", format!("{}: {e}", self.path.display()))
        })?;

        let snapshot = CatalogSnapshot::from_json(&json)?;
        debug!(records = snapshot.len(), "Catalogue snapshot loaded");
        Ok(snapshot)
    }
}

#[async_trait]
impl CatalogPort for JsonCatalogAdapter {
    async fn list_geolocated_entities(
        &self,
        kind: EntityKind,
    ) -> Result<Vec<SearchableEntity>, ApplicationError> {
        Ok(self.load_snapshot().await?.geolocated(kind))
    }

    async fn search_by_name(
        &self,
        term: &str,
        kind: Option<EntityKind>,
        limit: usize,
    ) -> Result<Vec<SearchableEntity>, ApplicationError> {
        Ok(self.load_snapshot().await?.search_by_name(term, kind, limit))
    }

    async fn find_by_id(
        &self,
        kind: EntityKind,
        id: &EntityId,
    ) -> Result<Option<SearchableEntity>, ApplicationError> {
        Ok(self.load_snapshot().await?.find(kind, id).cloned())
    }

    async fn is_available(&self) -> bool {
        self.load_snapshot().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_snapshot(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn reads_snapshot_from_disk() {
        let file = write_snapshot(
            r#"{"sites": [{"id": 1, "name": "Gastlosen", "latitude": 46.58, "longitude": 7.28},
                          {"id": 2, "name": "Unplaced"}]}"#,
        );
        let adapter = JsonCatalogAdapter::new(file.path());

        let sites = adapter.list_geolocated_entities(EntityKind::Site).await.unwrap();
        assert_eq!(sites.len(), 1);
        assert!(adapter.list_geolocated_entities(EntityKind::Sector).await.unwrap().is_empty());

        let found = adapter
            .find_by_id(EntityKind::Site, &EntityId::from(2_u64))
            .await
            .unwrap();
        assert_eq!(found.map(|e| e.name), Some("Unplaced".to_string()));
        assert!(adapter.is_available().await);
    }

    #[tokio::test]
    async fn missing_file_is_upstream_failure() {
        let adapter = JsonCatalogAdapter::new("/nonexistent/catalog.json");

        let err = adapter.search_by_name("x", None, 5).await.unwrap_err();
        assert!(matches!(err, ApplicationError::UpstreamUnavailable { .. }));
        assert!(!adapter.is_available().await);
    }
}
