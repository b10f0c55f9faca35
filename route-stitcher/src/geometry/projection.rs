//! Point-to-segment and point-to-polyline projection.
//!
//! Projection treats `(longitude, latitude)` as planar `(x, y)`. That is a
//! small-angle approximation that holds at city scale; the distances
//! reported back are still great-circle distances.

use crate::domain::{Coordinate, Polyline};

use super::distance::distance_meters;

/// A point projected onto one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentProjection {
    /// Projected point on the segment.
    pub point: Coordinate,
    /// Position along the segment, clamped to `[0, 1]`.
    pub t: f64,
}

/// The closest point of a polyline to some query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    /// Projected point on the polyline.
    pub point: Coordinate,
    /// Great-circle distance from the query point, in metres.
    pub distance: f64,
    /// Index of the first vertex of the segment `point` lies on.
    pub segment_index: usize,
}

impl ClosestPoint {
    /// A closest-point record for a point already known to lie on segment
    /// `segment_index`.
    pub fn on_segment(point: Coordinate, segment_index: usize) -> Self {
        Self {
            point,
            distance: 0.0,
            segment_index,
        }
    }
}

/// Projects `p` onto the segment `a -> b`.
///
/// A degenerate segment (`a == b`) projects everything onto `a` with `t = 0`.
pub fn closest_point_on_segment(p: Coordinate, a: Coordinate, b: Coordinate) -> SegmentProjection {
    let dx = b.longitude - a.longitude;
    let dy = b.latitude - a.latitude;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        return SegmentProjection { point: a, t: 0.0 };
    }

    let t = ((p.longitude - a.longitude) * dx + (p.latitude - a.latitude) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);

    // Snap to the endpoints so clamped projections compare equal to them.
    let point = if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        Coordinate::new(a.latitude + t * dy, a.longitude + t * dx)
    };

    SegmentProjection { point, t }
}

/// Iterates the segments of a polyline as `(index, start, end)`.
///
/// A single-point polyline yields one degenerate segment so callers
/// never have to special-case it.
pub(crate) fn segments(line: &Polyline) -> impl Iterator<Item = (usize, Coordinate, Coordinate)> + '_ {
    let points = line.points();
    let degenerate = (points.len() == 1).then(|| (0, points[0], points[0]));
    points
        .windows(2)
        .enumerate()
        .map(|(i, w)| (i, w[0], w[1]))
        .chain(degenerate)
}

/// Finds the closest point of `line` to `p`.
///
/// Ties go to the lowest segment index.
pub fn closest_point_on_route(p: Coordinate, line: &Polyline) -> ClosestPoint {
    let mut best = ClosestPoint {
        point: line.first(),
        distance: f64::INFINITY,
        segment_index: 0,
    };

    for (index, a, b) in segments(line) {
        let projection = closest_point_on_segment(p, a, b);
        let distance = distance_meters(p, projection.point);
        if distance < best.distance {
            best = ClosestPoint {
                point: projection.point,
                distance,
                segment_index: index,
            };
        }
    }

    best
}
