//! Route matching and path stitching.
//!
//! Answers: "which transit routes, ridden in what order and joined by
//! which walks, take me from here to there?"
//!
//! Every route part is scored against the origin and destination, then a
//! fixed-priority case ladder looks for one route, two routes meeting or
//! separated by a short walk, or a three-route relay, retrying once with
//! relaxed bounds before settling for the generic driving path.

mod compose;
mod config;
mod ladder;
mod result;
mod segment;


pub use compose::RouteComposer;
pub use config::MatchConfig;
pub use ladder::{Candidates, Plan, Step};
pub use result::{
    MatchCase, MatchTrace, NotFoundReason, PathPiece, PieceKind, PieceSource, PlanError,
    RouteOutcome, RoutingResult,
};
pub use segment::{RouteSegment, score_all};
