//! Route composition.
//!
//! `build_route` is the single entry point: fetch the driving fallback,
//! load the corpus, score every part, run the case ladder, then request
//! whatever walking legs the chosen plan needs.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::RouteCorpusCache;
use crate::corpus::RouteStore;
use crate::directions::{DirectionsProvider, TravelMode};
use crate::domain::Coordinate;
use crate::walking::walking_leg;

use super::config::MatchConfig;
use super::ladder::{self, Candidates, Plan, Step};
use super::result::{
    MatchCase, MatchTrace, NotFoundReason, PathPiece, PlanError, RouteOutcome, RoutingResult,
};
use super::segment::score_all;

/// Builds stitched trips over a cached route corpus.
pub struct RouteComposer<S, D> {
    corpus: Arc<RouteCorpusCache<S>>,
    directions: D,
    config: MatchConfig,
}

impl<S: RouteStore, D: DirectionsProvider> RouteComposer<S, D> {
    pub fn new(corpus: Arc<RouteCorpusCache<S>>, directions: D, config: MatchConfig) -> Self {
        Self {
            corpus,
            directions,
            config,
        }
    }

    pub fn corpus(&self) -> &RouteCorpusCache<S> {
        &self.corpus
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Plan a trip from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::Configuration` when the directions collaborator
    /// is not configured. Every other failure either degrades or becomes
    /// `RouteOutcome::NotFound`.
    pub async fn build_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteOutcome, PlanError> {
        let fallback_path = match self
            .directions
            .directions(origin, destination, TravelMode::Driving)
            .await
        {
            Ok(path) => path,
            Err(e) if e.is_configuration() => return Err(PlanError::Configuration(e)),
            Err(e) => {
                warn!(%origin, %destination, error = %e, "driving fallback unavailable");
                return Ok(RouteOutcome::NotFound(NotFoundReason::FallbackUnavailable {
                    message: e.to_string(),
                }));
            }
        };

        let corpus = self.corpus.load_corpus().await;
        let segments = score_all(origin, destination, &corpus, &self.config);
        let (start_candidates, end_candidates) = {
            let candidates = Candidates::select(&segments, &self.config);
            (candidates.starts.len(), candidates.ends.len())
        };

        let mut trace = MatchTrace {
            case: MatchCase::Fallback,
            relaxed: false,
            collapsed: false,
            segments: segments.len(),
            start_candidates,
            end_candidates,
            degraded_walks: 0,
            reason: String::new(),
        };

        debug!(
            segments = trace.segments,
            starts = trace.start_candidates,
            ends = trace.end_candidates,
            "scored route corpus"
        );

        let Some(plan) = ladder::run(&segments, destination, &self.config) else {
            trace.reason = if corpus.is_empty() {
                "route corpus is empty".to_string()
            } else {
                "no route combination found".to_string()
            };
            info!(%origin, %destination, reason = %trace.reason, "using driving fallback");
            return Ok(RouteOutcome::Found(RoutingResult::fallback(
                fallback_path,
                trace,
            )));
        };

        let Plan {
            case,
            relaxed,
            collapsed,
            steps,
            reason,
        } = plan;

        let (pieces, degraded_walks) = self.materialize(steps).await?;

        trace.case = case;
        trace.relaxed = relaxed;
        trace.collapsed = collapsed;
        trace.degraded_walks = degraded_walks;
        trace.reason = reason;

        info!(
            case = %trace.case,
            pieces = pieces.len(),
            relaxed,
            "route matched"
        );

        Ok(RouteOutcome::Found(RoutingResult::from_pieces(
            pieces,
            fallback_path,
            trace,
        )))
    }

    /// Turn plan steps into pieces, requesting walking legs in order.
    async fn materialize(&self, steps: Vec<Step>) -> Result<(Vec<PathPiece>, usize), PlanError> {
        let mut pieces = Vec::with_capacity(steps.len());
        let mut degraded = 0;

        for step in steps {
            let piece = match step {
                Step::Ride {
                    route_id,
                    part,
                    path,
                } => PathPiece::route(route_id, part, path),
                Step::Walk { from, to } => {
                    let leg = walking_leg(&self.directions, from, to)
                        .await
                        .map_err(PlanError::Configuration)?;
                    degraded += usize::from(leg.degraded);
                    PathPiece::walking(leg.path)
                }
            };
            pieces.push(piece);
        }

        Ok((pieces, degraded))
    }
}
