//! The in-memory route corpus handed to the scorer.

use std::sync::Arc;

use crate::domain::Polyline;

/// One route and its polyline parts.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusRoute {
    pub id: String,
    pub parts: Arc<Vec<Polyline>>,
}

impl CorpusRoute {
    pub fn new(id: impl Into<String>, parts: Vec<Polyline>) -> Self {
        Self {
            id: id.into(),
            parts: Arc::new(parts),
        }
    }
}

/// Every route known for one request, in index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteCorpus {
    pub routes: Vec<CorpusRoute>,
}

impl RouteCorpus {
    pub fn new(routes: Vec<CorpusRoute>) -> Self {
        Self { routes }
    }

    /// Total number of parts across all routes.
    pub fn part_count(&self) -> usize {
        self.routes.iter().map(|r| r.parts.len()).sum()
    }

    /// True when no route contributes a part.
    pub fn is_empty(&self) -> bool {
        self.part_count() == 0
    }
}
