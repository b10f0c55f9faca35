//! Runtime choice between the live store and local files.

use super::client::RouteStoreClient;
use super::error::CorpusError;
use super::mock::MockRouteStore;
use super::types::RouteDocument;
use super::RouteStore;

/// Route store selected at startup.
#[derive(Clone)]
pub enum RouteSource {
    /// Live Route Data Store over HTTP
    Http(RouteStoreClient),
    /// Documents loaded from a local directory
    Mock(MockRouteStore),
}

impl RouteSource {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RouteSource::Http(_) => "http",
            RouteSource::Mock(_) => "mock",
        }
    }
}

impl RouteStore for RouteSource {
    async fn fetch_index(&self) -> Result<Vec<String>, CorpusError> {
        match self {
            RouteSource::Http(client) => client.fetch_index().await,
            RouteSource::Mock(store) => store.fetch_index().await,
        }
    }

    async fn fetch_route(&self, route_id: &str) -> Result<RouteDocument, CorpusError> {
        match self {
            RouteSource::Http(client) => client.fetch_route(route_id).await,
            RouteSource::Mock(store) => store.fetch_route(route_id).await,
        }
    }

    async fn reload(&self) -> Result<(), CorpusError> {
        match self {
            RouteSource::Http(_) => Ok(()),
            RouteSource::Mock(store) => store.reload().await,
        }
    }
}
