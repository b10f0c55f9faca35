//! Approximate polyline intersection and endpoint gaps.
//!
//! Two polylines "intersect" when a vertex of one lies within a threshold
//! of its projection onto a segment of the other. Crossings between two
//! long segments with no vertex nearby are not detected; route polylines
//! are dense enough at city scale for this to hold in practice.

use crate::domain::{Coordinate, Polyline};

use super::distance::distance_meters;
use super::projection::{closest_point_on_segment, segments};

/// Where two polylines come within the threshold of each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Projected point; lies on whichever polyline received the projection.
    pub point: Coordinate,
    /// Gap between the vertex and its projection, in metres.
    pub distance: f64,
    /// Segment index on the first polyline.
    pub first_index: usize,
    /// Segment index on the second polyline.
    pub second_index: usize,
}

/// Which endpoints of two polylines are closest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointGap {
    /// Endpoint of the first polyline.
    pub from: Coordinate,
    /// Endpoint of the second polyline.
    pub to: Coordinate,
    /// True if `from` is the last point of the first polyline.
    pub from_is_last: bool,
    /// True if `to` is the first point of the second polyline.
    pub to_is_first: bool,
    pub distance: f64,
}

/// Every vertex-to-segment projection between segment `i` of the first
/// polyline and segment `j` of the second, as `(projected point, distance)`.
fn pair_projections(
    (a1, b1): (Coordinate, Coordinate),
    (a2, b2): (Coordinate, Coordinate),
) -> [(Coordinate, f64); 4] {
    let project = |p: Coordinate, a: Coordinate, b: Coordinate| {
        let proj = closest_point_on_segment(p, a, b).point;
        (proj, distance_meters(p, proj))
    };
    [
        project(a1, a2, b2),
        project(b1, a2, b2),
        project(a2, a1, b1),
        project(b2, a1, b1),
    ]
}

/// Returns true if the polylines come within `threshold_m` of each other.
pub fn routes_intersect(first: &Polyline, second: &Polyline, threshold_m: f64) -> bool {
    segments(first).any(|(_, a1, b1)| {
        segments(second).any(|(_, a2, b2)| {
            pair_projections((a1, b1), (a2, b2))
                .iter()
                .any(|(_, d)| *d <= threshold_m)
        })
    })
}

/// Finds the closest qualifying approach between two polylines.
///
/// Scans every segment pair and keeps the global minimum, not the first
/// hit. Returns `None` when no pair comes within `threshold_m`.
pub fn find_intersection_point(
    first: &Polyline,
    second: &Polyline,
    threshold_m: f64,
) -> Option<Intersection> {
    let mut best: Option<Intersection> = None;

    for (i, a1, b1) in segments(first) {
        for (j, a2, b2) in segments(second) {
            for (point, distance) in pair_projections((a1, b1), (a2, b2)) {
                if distance > threshold_m {
                    continue;
                }
                if best.is_none_or(|b| distance < b.distance) {
                    best = Some(Intersection {
                        point,
                        distance,
                        first_index: i,
                        second_index: j,
                    });
                }
            }
        }
    }

    best
}

/// Closest pair among the four endpoint combinations.
///
/// Ties resolve in the order start-start, start-end, end-start, end-end.
pub fn nearest_endpoints(first: &Polyline, second: &Polyline) -> EndpointGap {
    let candidates = [
        (first.first(), second.first(), false, true),
        (first.first(), second.last(), false, false),
        (first.last(), second.first(), true, true),
        (first.last(), second.last(), true, false),
    ];

    let gap = |(from, to, from_is_last, to_is_first): (Coordinate, Coordinate, bool, bool)| {
        EndpointGap {
            from,
            to,
            from_is_last,
            to_is_first,
            distance: distance_meters(from, to),
        }
    };

    let mut best = gap(candidates[0]);
    for candidate in &candidates[1..] {
        let next = gap(*candidate);
        if next.distance < best.distance {
            best = next;
        }
    }
    best
}

/// Minimum of the four endpoint-to-endpoint distances, in metres.
pub fn calculate_route_gap(first: &Polyline, second: &Polyline) -> f64 {
    nearest_endpoints(first, second).distance
}
