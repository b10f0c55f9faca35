//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::RouteCorpusCache;
use crate::corpus::RouteSource;
use crate::directions::DirectionsClient;
use crate::domain::FareSchedule;
use crate::planner::RouteComposer;

/// The composer as served: live or local routes, live directions.
pub type Composer = RouteComposer<RouteSource, DirectionsClient>;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Route composer over the cached corpus
    pub composer: Arc<Composer>,

    /// Fare formula for quotes
    pub fares: Arc<FareSchedule>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(composer: Composer, fares: FareSchedule) -> Self {
        Self {
            composer: Arc::new(composer),
            fares: Arc::new(fares),
        }
    }

    /// The corpus cache behind the composer.
    pub fn corpus(&self) -> &RouteCorpusCache<RouteSource> {
        self.composer.corpus()
    }
}
