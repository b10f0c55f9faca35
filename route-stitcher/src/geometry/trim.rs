//! Sub-path extraction between projected points.
//!
//! Direction along a polyline is inferred from segment index order: if the
//! start projection falls on a lower (or equal) segment than the end, the
//! polyline is walked forward, otherwise backward. This picks the wrong
//! direction when a route doubles back on itself near both query points;
//! callers get whichever sub-path the index order implies.

use crate::domain::{Coordinate, Polyline};

use super::distance::distance_meters;
use super::projection::ClosestPoint;

/// Closing points nearer than this to the previous point are dropped.
pub const DUPLICATE_POINT_M: f64 = 1.0;

/// Pushes `p` unless it is within [`DUPLICATE_POINT_M`] of the last point.
fn push_distinct(path: &mut Polyline, p: Coordinate) {
    if distance_meters(path.last(), p) > DUPLICATE_POINT_M {
        path.push(p);
    }
}

/// Extracts the sub-path of `line` from `start` to `end`.
///
/// The result begins with `start.point`, follows the polyline vertices
/// between the two segments in the inferred direction, and ends with
/// `end.point` unless that would add a near-zero final edge.
pub fn trim_between_points(line: &Polyline, start: &ClosestPoint, end: &ClosestPoint) -> Polyline {
    let points = line.points();
    let last_index = points.len() - 1;
    let start_index = start.segment_index.min(last_index);
    let end_index = end.segment_index.min(last_index);

    let mut path = Polyline::point(start.point);

    if start_index <= end_index {
        for p in &points[start_index + 1..=end_index] {
            path.push(*p);
        }
    } else {
        for p in points[end_index + 1..=start_index].iter().rev() {
            path.push(*p);
        }
    }

    push_distinct(&mut path, end.point);
    path
}

/// The prefix of `line` up to `end_point` on segment `end_index`.
pub fn trim_to_index(line: &Polyline, end_index: usize, end_point: Coordinate) -> Polyline {
    let points = line.points();
    let end_index = end_index.min(points.len() - 1);

    let mut path = Polyline::point(points[0]);
    for p in &points[1..=end_index] {
        path.push(*p);
    }
    push_distinct(&mut path, end_point);
    path
}

/// The suffix of `line` from `start_point` on segment `start_index`.
pub fn trim_from_index(line: &Polyline, start_index: usize, start_point: Coordinate) -> Polyline {
    let points = line.points();
    let start_index = start_index.min(points.len() - 1);

    let mut path = Polyline::point(start_point);
    for p in &points[start_index + 1..] {
        push_distinct(&mut path, *p);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::closest_point_on_route;

    fn line(points: &[(f64, f64)]) -> Polyline {
        Polyline::new(points.iter().map(|&(lat, lng)| Coordinate::new(lat, lng)).collect()).unwrap()
    }

    fn route() -> Polyline {
        line(&[(7.10, 125.45), (7.11, 125.45), (7.12, 125.45), (7.13, 125.45)])
    }

    #[test]
    fn forward_between_interior_points() {
        let route = route();
        let start = closest_point_on_route(Coordinate::new(7.105, 125.4501), &route);
        let end = closest_point_on_route(Coordinate::new(7.125, 125.4501), &route);

        let path = trim_between_points(&route, &start, &end);
        assert_eq!(path.len(), 4);
        assert_eq!(path.first(), start.point);
        assert_eq!(path.points()[1], Coordinate::new(7.11, 125.45));
        assert_eq!(path.points()[2], Coordinate::new(7.12, 125.45));
        assert_eq!(path.last(), end.point);
    }

    #[test]
    fn backward_when_start_is_later() {
        let route = route();
        let start = closest_point_on_route(Coordinate::new(7.125, 125.4501), &route);
        let end = closest_point_on_route(Coordinate::new(7.105, 125.4501), &route);

        let path = trim_between_points(&route, &start, &end);
        assert_eq!(path.len(), 4);
        assert_eq!(path.points()[1], Coordinate::new(7.12, 125.45));
        assert_eq!(path.points()[2], Coordinate::new(7.11, 125.45));
        assert_eq!(path.last(), end.point);
    }

    #[test]
    fn same_segment_gives_two_points() {
        let route = route();
        let start = closest_point_on_route(Coordinate::new(7.101, 125.45), &route);
        let end = closest_point_on_route(Coordinate::new(7.109, 125.45), &route);

        let path = trim_between_points(&route, &start, &end);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn coincident_projections_degenerate_to_one_point() {
        let route = route();
        let p = closest_point_on_route(Coordinate::new(7.105, 125.46), &route);

        let path = trim_between_points(&route, &p, &p);
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn whole_polyline_round_trip() {
        let route = route();
        let start = closest_point_on_route(route.first(), &route);
        let end = closest_point_on_route(route.last(), &route);

        let path = trim_between_points(&route, &start, &end);
        assert_eq!(path, route);
    }

    #[test]
    fn prefix_to_index() {
        let route = route();
        let cut = Coordinate::new(7.115, 125.45);
        let path = trim_to_index(&route, 1, cut);

        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), route.first());
        assert_eq!(path.last(), cut);
    }

    #[test]
    fn suffix_from_index() {
        let route = route();
        let cut = Coordinate::new(7.115, 125.45);
        let path = trim_from_index(&route, 1, cut);

        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), cut);
        assert_eq!(path.last(), route.last());
    }

    #[test]
    fn prefix_skips_duplicate_closing_point() {
        let route = route();
        let path = trim_to_index(&route, 1, Coordinate::new(7.11, 125.45));
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn out_of_range_indices_clamp() {
        let route = route();
        let path = trim_from_index(&route, 99, route.last());
        assert_eq!(path.len(), 1);

        let path = trim_to_index(&route, 99, route.last());
        assert_eq!(path, route);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::geometry::{closest_point_on_route, path_length};
    use proptest::prelude::*;

    fn polyline() -> impl Strategy<Value = Polyline> {
        prop::collection::vec((7.0..7.3f64, 125.3..125.6f64), 2..15).prop_map(|pts| {
            Polyline::new(pts.into_iter().map(|(lat, lng)| Coordinate::new(lat, lng)).collect())
                .unwrap()
        })
    }

    proptest! {
        /// Trimming between a polyline's own endpoints keeps its length.
        #[test]
        fn round_trip_keeps_length(route in polyline()) {
            let start = closest_point_on_route(route.first(), &route);
            let end = closest_point_on_route(route.last(), &route);
            let path = trim_between_points(&route, &start, &end);

            let original = path_length(&route);
            prop_assert!((path_length(&path) - original).abs() <= original * 1e-6 + DUPLICATE_POINT_M);
        }

        #[test]
        fn never_empty(route in polyline(), i in 0usize..20, j in 0usize..20) {
            let start = ClosestPoint::on_segment(route.first(), i);
            let end = ClosestPoint::on_segment(route.last(), j);
            prop_assert!(!trim_between_points(&route, &start, &end).points().is_empty());
        }
    }
}
