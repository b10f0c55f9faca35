//! The case ladder.
//!
//! Pure matching over scored segments. Each rung is tried in priority
//! order and the first to produce a plan wins. Plans name walking legs by
//! their endpoints only; the composer requests them once a plan is chosen.
//!
//! Candidate pairs are tried in nested pre-sorted order and the first pair
//! that qualifies is taken. This finds a workable trip quickly, not the
//! shortest one.

use std::cmp::Ordering;

use tracing::debug;

use crate::domain::{Coordinate, Polyline};
use crate::geometry::{
    ClosestPoint, Intersection, distance_meters, find_intersection_point, nearest_endpoints,
    path_length, routes_intersect, trim_between_points, trim_from_index, trim_to_index,
};

use super::config::MatchConfig;
use super::result::MatchCase;
use super::segment::RouteSegment;

/// One piece of a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Ride part `part` of `route_id` along `path`.
    Ride {
        route_id: String,
        part: usize,
        path: Polyline,
    },
    /// Walk from `from` to `to`.
    Walk { from: Coordinate, to: Coordinate },
}

impl Step {
    fn ride(segment: &RouteSegment, path: Polyline) -> Self {
        Step::Ride {
            route_id: segment.route_id.clone(),
            part: segment.part_index,
            path,
        }
    }

    /// Where this step ends.
    fn end(&self) -> Coordinate {
        match self {
            Step::Ride { path, .. } => path.last(),
            Step::Walk { to, .. } => *to,
        }
    }
}

/// A matched rung and the steps it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub case: MatchCase,
    pub relaxed: bool,
    pub collapsed: bool,
    pub steps: Vec<Step>,
    pub reason: String,
}

/// Start and end candidates under one set of bounds.
pub struct Candidates<'a> {
    /// Near the origin, nearest first.
    pub starts: Vec<&'a RouteSegment>,
    /// Near the destination, reaching segments first then nearest first.
    pub ends: Vec<&'a RouteSegment>,
}

impl<'a> Candidates<'a> {
    pub fn select(segments: &'a [RouteSegment], config: &MatchConfig) -> Self {
        let mut starts: Vec<_> = segments
            .iter()
            .filter(|s| s.distance_to_start() <= config.start_radius_m)
            .collect();
        starts.sort_by(|a, b| a.distance_to_start().total_cmp(&b.distance_to_start()));

        let mut ends: Vec<_> = segments
            .iter()
            .filter(|s| s.distance_to_end() <= config.end_radius_m)
            .collect();
        ends.sort_by(|a, b| by_reach_then_end(a, b));

        Self { starts, ends }
    }
}

fn by_reach_then_end(a: &RouteSegment, b: &RouteSegment) -> Ordering {
    b.reaches_destination
        .cmp(&a.reaches_destination)
        .then_with(|| a.distance_to_end().total_cmp(&b.distance_to_end()))
}

/// Run the whole ladder short of the fallback.
pub fn run(segments: &[RouteSegment], destination: Coordinate, config: &MatchConfig) -> Option<Plan> {
    let candidates = Candidates::select(segments, config);

    single_route_complete(segments, destination, config)
        .or_else(|| single_route_with_walking(segments, destination, config))
        .or_else(|| two_route_intersecting(&candidates, destination, config))
        .or_else(|| two_route_walking(&candidates, destination, config))
        .or_else(|| three_route_relay(&candidates, segments, destination, config, false))
        .or_else(|| relaxed_retry(segments, destination, config))
}

/// Single-route candidates: near the origin, nearest to the destination first.
fn single_candidates<'a>(segments: &'a [RouteSegment], config: &MatchConfig) -> Vec<&'a RouteSegment> {
    let mut candidates: Vec<_> = segments
        .iter()
        .filter(|s| s.distance_to_start() <= config.start_radius_m)
        .collect();
    candidates.sort_by(|a, b| {
        a.distance_to_end()
            .total_cmp(&b.distance_to_end())
            .then_with(|| a.distance_to_start().total_cmp(&b.distance_to_start()))
    });
    candidates
}

/// Appends a walk to `destination` if the plan stops short of it.
fn finish(mut steps: Vec<Step>, destination: Coordinate, config: &MatchConfig) -> Vec<Step> {
    if let Some(end) = steps.last().map(Step::end)
        && distance_meters(end, destination) > config.min_walk_m
    {
        steps.push(Step::Walk {
            from: end,
            to: destination,
        });
    }
    steps
}

fn single_route_complete(
    segments: &[RouteSegment],
    destination: Coordinate,
    config: &MatchConfig,
) -> Option<Plan> {
    let segment = single_candidates(segments, config)
        .into_iter()
        .find(|s| s.reaches_destination)?;

    debug!(route_id = %segment.route_id, part = segment.part_index, "single route reaches destination");

    Some(Plan {
        case: MatchCase::SingleRouteComplete,
        relaxed: false,
        collapsed: false,
        steps: finish(vec![Step::ride(segment, segment.trimmed.clone())], destination, config),
        reason: format!(
            "route {} passes {:.0} m from origin and {:.0} m from destination",
            segment.route_id,
            segment.distance_to_start(),
            segment.distance_to_end()
        ),
    })
}

fn single_route_with_walking(
    segments: &[RouteSegment],
    destination: Coordinate,
    config: &MatchConfig,
) -> Option<Plan> {
    let segment = single_candidates(segments, config)
        .into_iter()
        .find(|s| s.distance_to_end() <= config.walk_radius_m)?;

    debug!(route_id = %segment.route_id, part = segment.part_index, "single route with walking");

    Some(Plan {
        case: MatchCase::SingleRouteWithWalking,
        relaxed: false,
        collapsed: false,
        steps: vec![
            Step::ride(segment, segment.trimmed.clone()),
            Step::Walk {
                from: segment.trimmed.last(),
                to: destination,
            },
        ],
        reason: format!(
            "route {} then walk {:.0} m",
            segment.route_id,
            segment.distance_to_end()
        ),
    })
}

/// Stitch A into B at `x`, dropping B when it adds little.
fn stitch_at_intersection(
    a: &RouteSegment,
    b: &RouteSegment,
    x: &Intersection,
    destination: Coordinate,
    config: &MatchConfig,
) -> (Vec<Step>, bool) {
    let a_leg = trim_to_index(&a.trimmed, x.first_index, x.point);
    let b_leg = trim_from_index(&b.trimmed, x.second_index, x.point);

    let collapse = path_length(&b_leg) < config.short_leg_m
        && distance_meters(x.point, destination) <= config.collapse_radius_m;

    if collapse {
        let steps = vec![
            Step::ride(a, a_leg),
            Step::Walk {
                from: x.point,
                to: destination,
            },
        ];
        (steps, true)
    } else {
        let steps = vec![Step::ride(a, a_leg), Step::ride(b, b_leg)];
        (finish(steps, destination, config), false)
    }
}

/// First start/end pair on distinct routes that intersect.
fn first_intersecting_pair<'a>(
    starts: &[&'a RouteSegment],
    ends: &[&'a RouteSegment],
    threshold_m: f64,
) -> Option<(&'a RouteSegment, &'a RouteSegment, Intersection)> {
    starts.iter().find_map(|&a| {
        ends.iter()
            .filter(|b| !a.same_route(b))
            .find_map(|&b| find_intersection_point(&a.trimmed, &b.trimmed, threshold_m).map(|x| (a, b, x)))
    })
}

fn two_route_intersecting(
    candidates: &Candidates<'_>,
    destination: Coordinate,
    config: &MatchConfig,
) -> Option<Plan> {
    let (a, b, x) = first_intersecting_pair(
        &candidates.starts,
        &candidates.ends,
        config.intersection_threshold_m,
    )?;

    let (steps, collapsed) = stitch_at_intersection(a, b, &x, destination, config);

    debug!(
        first = %a.route_id,
        second = %b.route_id,
        gap_m = x.distance,
        collapsed,
        "two routes intersect"
    );

    let reason = if collapsed {
        format!(
            "route {} meets route {} {:.0} m from destination; walking instead",
            a.route_id,
            b.route_id,
            distance_meters(x.point, destination)
        )
    } else {
        format!("route {} meets route {} within {:.0} m", a.route_id, b.route_id, x.distance)
    };

    Some(Plan {
        case: MatchCase::TwoRouteIntersecting,
        relaxed: false,
        collapsed,
        steps,
        reason,
    })
}

fn two_route_walking(
    candidates: &Candidates<'_>,
    destination: Coordinate,
    config: &MatchConfig,
) -> Option<Plan> {
    let (a, b, gap) = candidates.starts.iter().find_map(|&a| {
        candidates
            .ends
            .iter()
            .filter(|b| !a.same_route(b))
            .find_map(|&b| {
                let gap = nearest_endpoints(&a.trimmed, &b.trimmed);
                // Only a walk from the end of A to the start of B rides both.
                let ordered = gap.from_is_last && gap.to_is_first;
                (ordered && gap.distance <= config.gap_allowance(b.trimmed_length_m))
                    .then_some((a, b, gap))
            })
    })?;

    debug!(first = %a.route_id, second = %b.route_id, gap_m = gap.distance, "two routes via walking gap");

    let steps = vec![
        Step::ride(a, a.trimmed.clone()),
        Step::Walk {
            from: gap.from,
            to: gap.to,
        },
        Step::ride(b, b.trimmed.clone()),
    ];

    Some(Plan {
        case: MatchCase::TwoRouteWalking,
        relaxed: false,
        collapsed: false,
        steps: finish(steps, destination, config),
        reason: format!(
            "walk {:.0} m from route {} to route {}",
            gap.distance, a.route_id, b.route_id
        ),
    })
}

/// A connector meeting `a` and `b`, searched in segment order.
fn find_connector<'a>(
    a: &RouteSegment,
    b: &RouteSegment,
    segments: &'a [RouteSegment],
    threshold_m: f64,
) -> Option<(&'a RouteSegment, Intersection, Intersection)> {
    segments
        .iter()
        .filter(|c| !c.same_route(a) && !c.same_route(b))
        .filter(|c| {
            routes_intersect(&a.trimmed, &c.part, threshold_m)
                && routes_intersect(&c.part, &b.trimmed, threshold_m)
        })
        .find_map(|c| {
            let x1 = find_intersection_point(&a.trimmed, &c.part, threshold_m)?;
            let x2 = find_intersection_point(&c.part, &b.trimmed, threshold_m)?;
            Some((c, x1, x2))
        })
}

fn three_route_relay(
    candidates: &Candidates<'_>,
    segments: &[RouteSegment],
    destination: Coordinate,
    config: &MatchConfig,
    all_pairs: bool,
) -> Option<Plan> {
    let pairs: Vec<(&RouteSegment, &RouteSegment)> = if all_pairs {
        candidates
            .starts
            .iter()
            .flat_map(|&a| candidates.ends.iter().map(move |&b| (a, b)))
            .collect()
    } else {
        candidates
            .starts
            .first()
            .zip(candidates.ends.first())
            .map(|(&a, &b)| (a, b))
            .into_iter()
            .collect()
    };

    let (a, b, c, x1, x2) = pairs
        .into_iter()
        .filter(|(a, b)| !a.same_route(b))
        .find_map(|(a, b)| {
            find_connector(a, b, segments, config.intersection_threshold_m)
                .map(|(c, x1, x2)| (a, b, c, x1, x2))
        })?;

    let a_leg = trim_to_index(&a.trimmed, x1.first_index, x1.point);
    let connector = trim_between_points(
        &c.part,
        &ClosestPoint::on_segment(x1.point, x1.second_index),
        &ClosestPoint::on_segment(x2.point, x2.first_index),
    );
    let b_leg = trim_from_index(&b.trimmed, x2.second_index, x2.point);

    debug!(
        first = %a.route_id,
        connector = %c.route_id,
        last = %b.route_id,
        "three-route relay"
    );

    let steps = vec![
        Step::ride(a, a_leg),
        Step::ride(c, connector),
        Step::ride(b, b_leg),
    ];

    Some(Plan {
        case: MatchCase::ThreeRouteRelay,
        relaxed: false,
        collapsed: false,
        steps: finish(steps, destination, config),
        reason: format!(
            "route {} to route {} via route {}",
            a.route_id, b.route_id, c.route_id
        ),
    })
}

fn relaxed_retry(segments: &[RouteSegment], destination: Coordinate, config: &MatchConfig) -> Option<Plan> {
    let relaxed = config.relaxed();
    let candidates = Candidates::select(segments, &relaxed);

    debug!(
        starts = candidates.starts.len(),
        ends = candidates.ends.len(),
        "retrying with relaxed bounds"
    );

    let plan = two_route_intersecting(&candidates, destination, &relaxed)
        .or_else(|| three_route_relay(&candidates, segments, destination, &relaxed, true))?;

    Some(Plan {
        case: MatchCase::RelaxedRetry,
        relaxed: true,
        reason: format!("{} (relaxed: {})", plan.reason, plan.case),
        ..plan
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CorpusRoute, RouteCorpus};
    use crate::planner::segment::score_all;

    fn line(points: &[(f64, f64)]) -> Polyline {
        Polyline::new(points.iter().map(|&(lat, lng)| Coordinate::new(lat, lng)).collect()).unwrap()
    }

    const ORIGIN: Coordinate = Coordinate::new(7.1, 125.45);
    const DESTINATION: Coordinate = Coordinate::new(7.2, 125.47);

    fn plan_with(config: &MatchConfig, routes: Vec<(&str, Polyline)>) -> Option<Plan> {
        let corpus = RouteCorpus::new(
            routes
                .into_iter()
                .map(|(id, p)| CorpusRoute::new(id, vec![p]))
                .collect(),
        );
        let segments = score_all(ORIGIN, DESTINATION, &corpus, config);
        run(&segments, DESTINATION, config)
    }

    fn plan(routes: Vec<(&str, Polyline)>) -> Option<Plan> {
        plan_with(&MatchConfig::default(), routes)
    }

    fn ride_ids(plan: &Plan) -> Vec<&str> {
        plan.steps
            .iter()
            .filter_map(|s| match s {
                Step::Ride { route_id, .. } => Some(route_id.as_str()),
                Step::Walk { .. } => None,
            })
            .collect()
    }

    fn walks(plan: &Plan) -> usize {
        plan.steps
            .iter()
            .filter(|s| matches!(s, Step::Walk { .. }))
            .count()
    }

    #[test]
    fn empty_segments_match_nothing() {
        assert_eq!(plan(vec![]), None);
    }

    #[test]
    fn single_route_without_residual_walk() {
        let plan = plan(vec![("A", line(&[(7.1, 125.45), (7.2, 125.47)]))]).unwrap();
        assert_eq!(plan.case, MatchCase::SingleRouteComplete);
        assert_eq!(ride_ids(&plan), vec!["A"]);
        assert_eq!(walks(&plan), 0);
    }

    #[test]
    fn single_route_walks_residual() {
        // Ends about 220 m short of the destination.
        let plan = plan(vec![("A", line(&[(7.1, 125.45), (7.198, 125.47)]))]).unwrap();
        assert_eq!(plan.case, MatchCase::SingleRouteComplete);
        assert_eq!(walks(&plan), 1);
        assert_eq!(plan.steps.last().map(Step::end), Some(DESTINATION));
    }

    #[test]
    fn single_route_walking_rung_when_reach_is_tighter() {
        let config = MatchConfig {
            reach_threshold_m: 50.0,
            ..MatchConfig::default()
        };
        let plan = plan_with(&config, vec![("A", line(&[(7.1, 125.45), (7.198, 125.47)]))]).unwrap();
        assert_eq!(plan.case, MatchCase::SingleRouteWithWalking);
        assert_eq!(walks(&plan), 1);
    }

    #[test]
    fn single_candidates_prefer_nearest_to_destination() {
        let plan = plan(vec![
            ("Far", line(&[(7.1, 125.45), (7.197, 125.47)])),
            ("Near", line(&[(7.1, 125.45), (7.2, 125.47)])),
        ])
        .unwrap();
        assert_eq!(ride_ids(&plan), vec!["Near"]);
    }

    #[test]
    fn two_routes_meet_at_crossing() {
        let plan = plan(vec![
            ("A", line(&[(7.0995, 125.45), (7.15, 125.45), (7.16, 125.45)])),
            ("B", line(&[(7.15, 125.44), (7.15, 125.47), (7.2005, 125.47)])),
        ])
        .unwrap();

        assert_eq!(plan.case, MatchCase::TwoRouteIntersecting);
        assert!(!plan.collapsed);
        assert_eq!(ride_ids(&plan), vec!["A", "B"]);
        assert_eq!(walks(&plan), 0);
    }

    #[test]
    fn short_second_leg_near_destination_collapses() {
        // A stops 330 m short of the destination, outside the tightened
        // reach; B crosses A's end and covers the last few hundred metres.
        let config = MatchConfig {
            reach_threshold_m: 200.0,
            walk_radius_m: 200.0,
            ..MatchConfig::default()
        };
        let plan = plan_with(
            &config,
            vec![
                ("A", line(&[(7.1, 125.45), (7.1, 125.47), (7.197, 125.47)])),
                ("B", line(&[(7.197, 125.469), (7.197, 125.471), (7.2, 125.471)])),
            ],
        )
        .unwrap();

        assert_eq!(plan.case, MatchCase::TwoRouteIntersecting);
        assert!(plan.collapsed);
        assert_eq!(ride_ids(&plan), vec!["A"]);
        assert_eq!(plan.steps.last().map(Step::end), Some(DESTINATION));
    }

    #[test]
    fn parallel_routes_bridged_by_walk() {
        // A ends 300 m west of where B starts; they never come within 100 m.
        let plan = plan(vec![
            ("A", line(&[(7.1, 125.45), (7.15, 125.45)])),
            ("B", line(&[(7.15, 125.4527), (7.2, 125.47)])),
        ])
        .unwrap();

        assert_eq!(plan.case, MatchCase::TwoRouteWalking);
        assert_eq!(ride_ids(&plan), vec!["A", "B"]);
        assert!(matches!(plan.steps[1], Step::Walk { .. }));
    }

    #[test]
    fn short_second_leg_extends_walking_gap() {
        // A ends about 770 m from where B starts; B covers the last 220 m.
        let routes = || {
            vec![
                ("A", line(&[(7.1, 125.45), (7.198, 125.463)])),
                ("B", line(&[(7.198, 125.47), (7.2, 125.47)])),
            ]
        };

        let plan = plan(routes()).unwrap();
        assert_eq!(plan.case, MatchCase::TwoRouteWalking);
        assert_eq!(ride_ids(&plan), vec!["A", "B"]);
        assert_eq!(walks(&plan), 1);

        // Without the short-leg extension the same gap is too long.
        let config = MatchConfig {
            short_leg_m: 100.0,
            ..MatchConfig::default()
        };
        let plan = plan_with(&config, routes());
        assert_ne!(plan.map(|p| p.case), Some(MatchCase::TwoRouteWalking));
    }

    #[test]
    fn walking_gap_needs_end_of_first_and_start_of_second() {
        // B starts about 500 m east of the origin, next to where A starts,
        // and never comes near A's far end.
        let config = MatchConfig {
            start_radius_m: 100.0,
            ..MatchConfig::default()
        };
        let plan = plan_with(
            &config,
            vec![
                ("A", line(&[(7.1, 125.45), (7.15, 125.45)])),
                ("B", line(&[(7.1, 125.4545), (7.2, 125.47)])),
            ],
        );

        assert_ne!(plan.map(|p| p.case), Some(MatchCase::TwoRouteWalking));
    }

    #[test]
    fn relay_through_connector() {
        // A heads north, B reaches the destination further east, C crosses both.
        let plan = plan(vec![
            ("A", line(&[(7.1, 125.45), (7.13, 125.45)])),
            ("B", line(&[(7.16, 125.47), (7.2, 125.47)])),
            (
                "C",
                line(&[
                    (7.12, 125.44),
                    (7.12, 125.45),
                    (7.12, 125.46),
                    (7.17, 125.46),
                    (7.17, 125.47),
                    (7.17, 125.48),
                ]),
            ),
        ]);

        // B starts far from A's end and C never comes near the destination.
        let plan = plan.unwrap();
        assert_eq!(plan.case, MatchCase::ThreeRouteRelay);
        assert_eq!(ride_ids(&plan), vec!["A", "C", "B"]);
    }

    #[test]
    fn relaxed_retry_finds_distant_start() {
        // A starts 2 km from the origin and crosses B.
        let plan = plan(vec![
            ("A", line(&[(7.1, 125.468), (7.14, 125.468), (7.15, 125.468)])),
            ("B", line(&[(7.14, 125.46), (7.14, 125.475), (7.2, 125.475), (7.2, 125.47)])),
        ])
        .unwrap();

        assert_eq!(plan.case, MatchCase::RelaxedRetry);
        assert!(plan.relaxed);
        assert_eq!(ride_ids(&plan), vec!["A", "B"]);
    }

    #[test]
    fn relaxed_retry_relays_through_connector() {
        // A starts 2 km from the origin and never meets B; C crosses both.
        let plan = plan(vec![
            ("A", line(&[(7.1, 125.468), (7.125, 125.468), (7.135, 125.468)])),
            ("B", line(&[(7.16, 125.47), (7.2, 125.47)])),
            (
                "C",
                line(&[
                    (7.125, 125.465),
                    (7.125, 125.48),
                    (7.17, 125.48),
                    (7.17, 125.47),
                    (7.17, 125.465),
                ]),
            ),
        ])
        .unwrap();

        assert_eq!(plan.case, MatchCase::RelaxedRetry);
        assert!(plan.relaxed);
        assert_eq!(ride_ids(&plan), vec!["A", "C", "B"]);
        assert!(plan.reason.ends_with("(relaxed: three_route_relay)"));
    }

    #[test]
    fn nothing_nearby_matches_nothing() {
        assert_eq!(plan(vec![("Z", line(&[(7.5, 125.9), (7.6, 125.9)]))]), None);
    }

    #[test]
    fn candidates_are_ordered() {
        let corpus = RouteCorpus::new(vec![
            CorpusRoute::new("Far", vec![line(&[(7.105, 125.45), (7.195, 125.47)])]),
            CorpusRoute::new("Near", vec![line(&[(7.1, 125.45), (7.2, 125.47)])]),
        ]);
        let config = MatchConfig::default();
        let segments = score_all(ORIGIN, DESTINATION, &corpus, &config);
        let candidates = Candidates::select(&segments, &config);

        assert_eq!(candidates.starts[0].route_id, "Near");
        assert_eq!(candidates.ends[0].route_id, "Near");
    }
}
