//! Domain types for the route stitcher.
//!
//! Value types shared by every layer: coordinates, polylines and the
//! fare formula. Types enforce their invariants at construction time.

mod coordinate;
mod error;
pub mod fare;

pub use coordinate::{Coordinate, Polyline};
pub use error::DomainError;
pub use fare::{Fare, FareSchedule};
