//! Caching layer for Route Data Store responses.
//!
//! The route index and each route's converted parts are cached separately.
//! Failed fetches are never cached: the caller sees an empty result and the
//! next request tries the store again.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use moka::future::Cache as MokaCache;
use tracing::{debug, warn};

use crate::corpus::{CorpusError, CorpusRoute, RouteCorpus, RouteStore, convert_route_document};
use crate::domain::Polyline;

/// Cached route index.
type IndexEntry = Arc<Vec<String>>;

/// Cached parts for one route.
type PartsEntry = Arc<Vec<Polyline>>;

/// Configuration for the corpus cache.
#[derive(Debug, Clone)]
pub struct CorpusCacheConfig {
    /// TTL for cached entries. `None` keeps them until invalidated.
    pub ttl: Option<Duration>,

    /// Maximum number of cached routes.
    pub max_capacity: u64,

    /// Number of routes fetched concurrently when loading the corpus.
    pub batch_size: usize,
}

impl Default for CorpusCacheConfig {
    fn default() -> Self {
        Self {
            ttl: None,
            max_capacity: 10_000,
            batch_size: 8,
        }
    }
}

impl CorpusCacheConfig {
    /// Expire entries after `ttl`.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the number of concurrent route fetches.
    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }
}

/// Read-through cache over a [`RouteStore`].
///
/// Safe to share between concurrent queries. Two callers missing on the
/// same key may both reach the store; neither sees a partial entry.
pub struct RouteCorpusCache<S> {
    store: S,
    index: MokaCache<(), IndexEntry>,
    parts: MokaCache<String, PartsEntry>,
    batch_size: usize,
}

impl<S: RouteStore> RouteCorpusCache<S> {
    /// Create a new cache in front of `store`.
    pub fn new(store: S, config: &CorpusCacheConfig) -> Self {
        let mut index = MokaCache::builder().max_capacity(1);
        let mut parts = MokaCache::builder().max_capacity(config.max_capacity);
        if let Some(ttl) = config.ttl {
            index = index.time_to_live(ttl);
            parts = parts.time_to_live(ttl);
        }

        Self {
            store,
            index: index.build(),
            parts: parts.build(),
            batch_size: config.batch_size.max(1),
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Route identifiers, fetched on first use.
    ///
    /// A store failure yields an empty list and is not cached.
    pub async fn load_index(&self) -> IndexEntry {
        if let Some(cached) = self.index.get(&()).await {
            return cached;
        }

        match self.store.fetch_index().await {
            Ok(ids) => {
                debug!(routes = ids.len(), "loaded route index");
                let entry = Arc::new(ids);
                self.index.insert((), entry.clone()).await;
                entry
            }
            Err(e) => {
                warn!(error = %e, "failed to load route index, using empty");
                Arc::new(Vec::new())
            }
        }
    }

    /// Parts of one route, fetched and converted on first use.
    ///
    /// A store failure yields no parts and is not cached. A route whose
    /// features were all skipped is cached as empty.
    pub async fn load_parts(&self, route_id: &str) -> PartsEntry {
        if let Some(cached) = self.parts.get(route_id).await {
            return cached;
        }

        match self.store.fetch_route(route_id).await {
            Ok(document) => {
                let parts = convert_route_document(route_id, &document);
                debug!(route_id, parts = parts.len(), "loaded route parts");
                let entry = Arc::new(parts);
                self.parts.insert(route_id.to_string(), entry.clone()).await;
                entry
            }
            Err(e) => {
                warn!(route_id, error = %e, "failed to load route, skipping");
                Arc::new(Vec::new())
            }
        }
    }

    /// Every route in the index with its parts, in index order.
    ///
    /// Routes are fetched `batch_size` at a time.
    pub async fn load_corpus(&self) -> RouteCorpus {
        let ids = self.load_index().await;
        let mut routes = Vec::with_capacity(ids.len());

        for batch in ids.chunks(self.batch_size) {
            let futures: Vec<_> = batch
                .iter()
                .map(|id| async move {
                    let parts = self.load_parts(id).await;
                    CorpusRoute {
                        id: id.clone(),
                        parts,
                    }
                })
                .collect();

            routes.extend(join_all(futures).await);
        }

        let corpus = RouteCorpus::new(routes);
        debug!(
            routes = corpus.routes.len(),
            parts = corpus.part_count(),
            "route corpus ready"
        );
        corpus
    }

    /// Drop every cached index and route entry.
    pub fn invalidate(&self) {
        self.index.invalidate_all();
        self.parts.invalidate_all();
        debug!("route corpus cache invalidated");
    }

    /// Reload the store's data, then drop every cached entry.
    pub async fn refresh(&self) -> Result<(), CorpusError> {
        self.store.reload().await?;
        self.invalidate();
        Ok(())
    }
}
