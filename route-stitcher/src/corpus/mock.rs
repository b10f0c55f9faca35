//! In-memory Route Data Store for development and tests.
//!
//! Serves route documents loaded from a directory of `{id}.geojson` files
//! or handed in directly, and counts fetches so caching can be observed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::Polyline;

use super::convert::document_from_parts;
use super::error::CorpusError;
use super::types::RouteDocument;
use super::RouteStore;

/// Mock Route Data Store serving fixed documents.
#[derive(Clone, Default)]
pub struct MockRouteStore {
    /// Documents keyed by route identifier; iteration order is the index order.
    documents: Arc<RwLock<BTreeMap<String, RouteDocument>>>,
    /// Directory the documents were read from, if any.
    data_dir: Option<PathBuf>,
    index_fetches: Arc<AtomicUsize>,
    route_fetches: Arc<AtomicUsize>,
}

impl MockRouteStore {
    /// Load every `*.geojson` or `*.json` file in `data_dir`.
    ///
    /// The file stem is the route identifier. Files that cannot be read or
    /// parsed are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::Io` if the directory itself cannot be read.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let data_dir = data_dir.as_ref();
        let documents = load_dir(data_dir)?;
        Ok(Self {
            data_dir: Some(data_dir.to_path_buf()),
            ..Self::from_map(documents)
        })
    }

    /// Serve one `LineString` feature per part for each route.
    pub fn from_parts(routes: impl IntoIterator<Item = (impl Into<String>, Vec<Polyline>)>) -> Self {
        Self::from_map(
            routes
                .into_iter()
                .map(|(id, parts)| (id.into(), document_from_parts(&parts)))
                .collect(),
        )
    }

    fn from_map(documents: BTreeMap<String, RouteDocument>) -> Self {
        Self {
            documents: Arc::new(RwLock::new(documents)),
            ..Self::default()
        }
    }

    /// Number of index requests served.
    pub fn index_fetches(&self) -> usize {
        self.index_fetches.load(Ordering::Relaxed)
    }

    /// Number of route document requests served.
    pub fn route_fetches(&self) -> usize {
        self.route_fetches.load(Ordering::Relaxed)
    }

    /// Re-read the data directory. Stores built in memory are unchanged.
    pub async fn reload(&self) -> Result<(), CorpusError> {
        let Some(data_dir) = &self.data_dir else {
            return Ok(());
        };
        let fresh = load_dir(data_dir)?;
        debug!(routes = fresh.len(), dir = ?data_dir, "reloaded route files");
        *self.documents.write().await = fresh;
        Ok(())
    }

    /// Fetch the list of route identifiers.
    pub async fn fetch_index(&self) -> Result<Vec<String>, CorpusError> {
        self.index_fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self.documents.read().await.keys().cloned().collect())
    }

    /// Fetch the geometry document for one route.
    pub async fn fetch_route(&self, route_id: &str) -> Result<RouteDocument, CorpusError> {
        self.route_fetches.fetch_add(1, Ordering::Relaxed);
        self.documents
            .read()
            .await
            .get(route_id)
            .cloned()
            .ok_or_else(|| CorpusError::RouteNotFound(route_id.to_string()))
    }
}

impl RouteStore for MockRouteStore {
    async fn fetch_index(&self) -> Result<Vec<String>, CorpusError> {
        MockRouteStore::fetch_index(self).await
    }

    async fn fetch_route(&self, route_id: &str) -> Result<RouteDocument, CorpusError> {
        MockRouteStore::fetch_route(self, route_id).await
    }

    async fn reload(&self) -> Result<(), CorpusError> {
        MockRouteStore::reload(self).await
    }
}

fn load_dir(data_dir: &Path) -> Result<BTreeMap<String, RouteDocument>, CorpusError> {
    let entries = std::fs::read_dir(data_dir).map_err(|e| CorpusError::Io {
        message: format!("Failed to read route data directory {data_dir:?}: {e}"),
    })?;

    let mut documents = BTreeMap::new();

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                warn!(dir = ?data_dir, error = %e, "skipping unreadable directory entry");
                continue;
            }
        };

        let is_route_file = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("geojson" | "json")
        );
        if !path.is_file() || !is_route_file {
            continue;
        }

        let Some(route_id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                warn!(file = ?path, error = %e, "skipping unreadable route file");
                continue;
            }
        };

        match serde_json::from_str::<RouteDocument>(&json) {
            Ok(document) => {
                documents.insert(route_id.to_string(), document);
            }
            Err(e) => warn!(file = ?path, error = %e, "skipping unparseable route file"),
        }
    }

    Ok(documents)
}
