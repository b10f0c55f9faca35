//! Route Data Store access.
//!
//! The store publishes an index of route identifiers and, per identifier,
//! a GeoJSON-like feature collection of the route's geometry.
//!
//! Key characteristics:
//! - Each `LineString` is one part, each line of a `MultiLineString` another
//! - Unusable features are skipped individually and never fail a route
//! - Coordinates arrive in `[longitude, latitude]` order

mod client;
mod convert;
mod error;
mod mock;
mod model;
mod source;
mod types;

use std::future::Future;

pub use client::{RouteStoreClient, RouteStoreConfig};
pub use convert::{ConversionError, convert_feature, convert_route_document, document_from_parts};
pub use error::CorpusError;
pub use mock::MockRouteStore;
pub use model::{CorpusRoute, RouteCorpus};
pub use source::RouteSource;
pub use types::RouteDocument;

/// Trait for fetching route data.
///
/// This abstraction allows the corpus cache to be tested against local data.
pub trait RouteStore: Send + Sync {
    /// Fetch the list of route identifiers.
    fn fetch_index(&self) -> impl Future<Output = Result<Vec<String>, CorpusError>> + Send;

    /// Fetch the geometry document for one route.
    fn fetch_route(
        &self,
        route_id: &str,
    ) -> impl Future<Output = Result<RouteDocument, CorpusError>> + Send;

    /// Re-read the backing data, for stores that hold a snapshot of it.
    fn reload(&self) -> impl Future<Output = Result<(), CorpusError>> + Send {
        async { Ok(()) }
    }
}
