//! Geometry kernel and path trimming.
//!
//! Pure functions over coordinates and polylines. Nothing here performs
//! I/O or fails; degenerate inputs produce degenerate but valid outputs
//! (zero distances, single-point paths).
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`distance_meters`] | Haversine distance between two coordinates |
//! | [`path_length`] | Total great-circle length of a polyline |
//! | [`closest_point_on_segment`] | Clamped planar projection onto a segment |
//! | [`closest_point_on_route`] | Closest projection over every segment of a polyline |
//! | [`routes_intersect`] | Whether two polylines come within a threshold |
//! | [`find_intersection_point`] | Closest qualifying approach between two polylines |
//! | [`calculate_route_gap`] | Minimum endpoint-to-endpoint distance |
//! | [`trim_between_points`] | Sub-path between two projections |

mod distance;
mod intersection;
mod projection;
mod trim;

pub use distance::{EARTH_RADIUS_M, distance_meters, path_length};
pub use intersection::{
    EndpointGap, Intersection, calculate_route_gap, find_intersection_point, nearest_endpoints,
    routes_intersect,
};
pub use projection::{
    ClosestPoint, SegmentProjection, closest_point_on_route, closest_point_on_segment,
};
pub use trim::{DUPLICATE_POINT_M, trim_between_points, trim_from_index, trim_to_index};
