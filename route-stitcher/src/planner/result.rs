//! Routing results and outcomes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::directions::DirectionsError;
use crate::domain::{Fare, FareSchedule, Polyline};
use crate::geometry::path_length;

/// Where a path piece came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PieceSource {
    /// Part `part` of route `route_id`.
    Route { route_id: String, part: usize },
    /// A walking leg.
    Walking,
    /// The generic driving path.
    DrivingFallback,
}

/// Display classification of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    Transit,
    Walking,
    Fallback,
}

/// One tagged polyline of a stitched path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathPiece {
    pub source: PieceSource,
    pub path: Polyline,
    pub length_m: f64,
}

impl PathPiece {
    pub fn new(source: PieceSource, path: Polyline) -> Self {
        let length_m = path_length(&path);
        Self {
            source,
            path,
            length_m,
        }
    }

    pub fn route(route_id: impl Into<String>, part: usize, path: Polyline) -> Self {
        Self::new(
            PieceSource::Route {
                route_id: route_id.into(),
                part,
            },
            path,
        )
    }

    pub fn walking(path: Polyline) -> Self {
        Self::new(PieceSource::Walking, path)
    }

    pub fn kind(&self) -> PieceKind {
        match self.source {
            PieceSource::Route { .. } => PieceKind::Transit,
            PieceSource::Walking => PieceKind::Walking,
            PieceSource::DrivingFallback => PieceKind::Fallback,
        }
    }

    /// Route identifier, for route pieces.
    pub fn route_id(&self) -> Option<&str> {
        match &self.source {
            PieceSource::Route { route_id, .. } => Some(route_id),
            _ => None,
        }
    }
}

/// Which rung of the case ladder produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCase {
    SingleRouteComplete,
    SingleRouteWithWalking,
    TwoRouteIntersecting,
    TwoRouteWalking,
    ThreeRouteRelay,
    RelaxedRetry,
    Fallback,
}

impl MatchCase {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchCase::SingleRouteComplete => "single_route_complete",
            MatchCase::SingleRouteWithWalking => "single_route_with_walking",
            MatchCase::TwoRouteIntersecting => "two_route_intersecting",
            MatchCase::TwoRouteWalking => "two_route_walking",
            MatchCase::ThreeRouteRelay => "three_route_relay",
            MatchCase::RelaxedRetry => "relaxed_retry",
            MatchCase::Fallback => "fallback",
        }
    }
}

impl fmt::Display for MatchCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a result was chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchTrace {
    pub case: MatchCase,
    /// Relaxed bounds were in effect.
    pub relaxed: bool,
    /// A two-route match dropped its short second leg for a walk.
    pub collapsed: bool,
    /// Route parts scored.
    pub segments: usize,
    /// Start candidates under the initial bounds.
    pub start_candidates: usize,
    /// End candidates under the initial bounds.
    pub end_candidates: usize,
    /// Walking legs replaced by straight lines.
    pub degraded_walks: usize,
    pub reason: String,
}

/// A stitched trip.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingResult {
    /// Pieces in travel order.
    pub pieces: Vec<PathPiece>,
    /// All pieces concatenated.
    pub stitched: Polyline,
    /// The driving path, computed for every query.
    pub fallback_path: Polyline,
    pub used_fallback: bool,
    pub trace: MatchTrace,
    /// Length of `stitched`, in metres.
    pub distance_m: f64,
    pub computed_at: DateTime<Utc>,
}

impl RoutingResult {
    /// Build a result from its pieces. `pieces` must not be empty.
    pub(crate) fn from_pieces(
        pieces: Vec<PathPiece>,
        fallback_path: Polyline,
        trace: MatchTrace,
    ) -> Self {
        let mut stitched = pieces
            .first()
            .map(|p| p.path.clone())
            .unwrap_or_else(|| fallback_path.clone());
        for piece in pieces.iter().skip(1) {
            stitched.append(&piece.path);
        }

        Self {
            distance_m: path_length(&stitched),
            used_fallback: trace.case == MatchCase::Fallback,
            pieces,
            stitched,
            fallback_path,
            trace,
            computed_at: Utc::now(),
        }
    }

    /// The driving path on its own.
    pub(crate) fn fallback(fallback_path: Polyline, trace: MatchTrace) -> Self {
        let piece = PathPiece::new(PieceSource::DrivingFallback, fallback_path.clone());
        Self::from_pieces(vec![piece], fallback_path, trace)
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    pub fn fare(&self, schedule: &FareSchedule) -> Fare {
        schedule.quote(self.distance_km())
    }

    pub fn route_ids(&self) -> Vec<&str> {
        self.pieces.iter().filter_map(PathPiece::route_id).collect()
    }
}

/// Why no result could be produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NotFoundReason {
    /// The mandatory driving path could not be obtained.
    FallbackUnavailable { message: String },
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::FallbackUnavailable { message } => {
                write!(f, "no route available: fallback path failed ({message})")
            }
        }
    }
}

/// Outcome of one `build_route` call.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    Found(RoutingResult),
    NotFound(NotFoundReason),
}

impl RouteOutcome {
    pub fn found(self) -> Option<RoutingResult> {
        match self {
            RouteOutcome::Found(result) => Some(result),
            RouteOutcome::NotFound(_) => None,
        }
    }
}

/// Fatal planning errors.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// A collaborator is missing configuration.
    #[error("configuration error: {0}")]
    Configuration(#[source] DirectionsError),
}
