//! Great-circle distances.

use crate::domain::{Coordinate, Polyline};

/// Mean Earth radius used by every distance in the crate, in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two coordinates, in metres.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points.
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Sum of consecutive great-circle distances along a polyline.
///
/// A single-point polyline has length zero.
pub fn path_length(line: &Polyline) -> f64 {
    line.points()
        .windows(2)
        .map(|w| distance_meters(w[0], w[1]))
        .sum()
}
