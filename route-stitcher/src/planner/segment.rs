//! Per-query scoring of route parts.

use crate::corpus::RouteCorpus;
use crate::domain::{Coordinate, Polyline};
use crate::geometry::{ClosestPoint, closest_point_on_route, path_length, trim_between_points};

use super::config::MatchConfig;

/// One route part scored against an origin and destination.
#[derive(Debug, Clone)]
pub struct RouteSegment {
    pub route_id: String,
    pub part_index: usize,
    /// The full part.
    pub part: Polyline,
    /// The part between the origin and destination projections, oriented
    /// from the origin side.
    pub trimmed: Polyline,
    pub start: ClosestPoint,
    pub end: ClosestPoint,
    pub trimmed_length_m: f64,
    pub reaches_destination: bool,
}

impl RouteSegment {
    /// Score one part.
    pub fn score(
        route_id: &str,
        part_index: usize,
        part: &Polyline,
        origin: Coordinate,
        destination: Coordinate,
        config: &MatchConfig,
    ) -> Self {
        let start = closest_point_on_route(origin, part);
        let end = closest_point_on_route(destination, part);
        let trimmed = trim_between_points(part, &start, &end);
        let trimmed_length_m = path_length(&trimmed);

        Self {
            route_id: route_id.to_string(),
            part_index,
            part: part.clone(),
            trimmed,
            reaches_destination: end.distance <= config.reach_threshold_m,
            start,
            end,
            trimmed_length_m,
        }
    }

    /// Distance from the origin to this part, in metres.
    pub fn distance_to_start(&self) -> f64 {
        self.start.distance
    }

    /// Distance from the destination to this part, in metres.
    pub fn distance_to_end(&self) -> f64 {
        self.end.distance
    }

    /// True if both segments come from the same route.
    pub fn same_route(&self, other: &RouteSegment) -> bool {
        self.route_id == other.route_id
    }
}

/// Score every part of every route, in corpus order. No filtering.
pub fn score_all(
    origin: Coordinate,
    destination: Coordinate,
    corpus: &RouteCorpus,
    config: &MatchConfig,
) -> Vec<RouteSegment> {
    corpus
        .routes
        .iter()
        .flat_map(|route| {
            route.parts.iter().enumerate().map(|(i, part)| {
                RouteSegment::score(&route.id, i, part, origin, destination, config)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusRoute;

    fn line(points: &[(f64, f64)]) -> Polyline {
        Polyline::new(points.iter().map(|&(lat, lng)| Coordinate::new(lat, lng)).collect()).unwrap()
    }

    const ORIGIN: Coordinate = Coordinate::new(7.1, 125.45);
    const DESTINATION: Coordinate = Coordinate::new(7.2, 125.47);

    #[test]
    fn scores_every_part() {
        let corpus = RouteCorpus::new(vec![
            CorpusRoute::new("A", vec![line(&[(7.1, 125.45), (7.2, 125.47)])]),
            CorpusRoute::new(
                "B",
                vec![line(&[(7.0, 125.3), (7.01, 125.3)]), line(&[(7.3, 125.6)])],
            ),
        ]);

        let segments = score_all(ORIGIN, DESTINATION, &corpus, &MatchConfig::default());
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].route_id, "A");
        assert_eq!(segments[2].route_id, "B");
        assert_eq!(segments[2].part_index, 1);
    }

    #[test]
    fn direct_route_reaches_destination() {
        let part = line(&[(7.0995, 125.45), (7.15, 125.46), (7.2005, 125.47)]);
        let seg = RouteSegment::score("A", 0, &part, ORIGIN, DESTINATION, &MatchConfig::default());

        assert!(seg.distance_to_start() < 50.0);
        assert!(seg.distance_to_end() < 50.0);
        assert!(seg.reaches_destination);
        assert!(seg.trimmed_length_m > 10_000.0);
        assert_eq!(seg.trimmed.first(), seg.start.point);
    }

    #[test]
    fn far_route_does_not_reach() {
        let part = line(&[(7.0, 125.3), (7.01, 125.3)]);
        let seg = RouteSegment::score("B", 0, &part, ORIGIN, DESTINATION, &MatchConfig::default());

        assert!(!seg.reaches_destination);
        assert!(seg.distance_to_start() > 10_000.0);
    }

    #[test]
    fn reversed_route_is_trimmed_from_origin_side() {
        let part = line(&[(7.2005, 125.47), (7.15, 125.46), (7.0995, 125.45)]);
        let seg = RouteSegment::score("A", 0, &part, ORIGIN, DESTINATION, &MatchConfig::default());

        assert_eq!(seg.trimmed.first(), seg.start.point);
        assert_eq!(seg.trimmed.last(), seg.end.point);
    }
}
