//! Directions collaborator.
//!
//! Supplies road and foot paths between two coordinates. Driving paths back
//! the fallback result; walking paths link route pieces together.
//!
//! Key characteristics:
//! - Paths arrive as encoded polylines at 1e-5 degree precision
//! - A missing API key is a configuration failure, reported before any I/O
//! - Provider statuses other than `OK` surface as `DirectionsError::Status`

mod client;
mod error;
pub mod polyline;
mod types;

use std::future::Future;

use crate::domain::{Coordinate, Polyline};

pub use client::{DirectionsClient, DirectionsConfig, path_from_response};
pub use error::DirectionsError;
pub use types::{DirectionsResponse, DirectionsRoute, EncodedPolyline};

/// Travel mode for a directions request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TravelMode {
    Driving,
    Walking,
}

impl TravelMode {
    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
        }
    }
}

/// Trait for providing paths between coordinates.
///
/// This abstraction allows the composer to be tested with mock paths.
pub trait DirectionsProvider: Send + Sync {
    /// Get a path from `origin` to `destination` for the given mode.
    fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> impl Future<Output = Result<Polyline, DirectionsError>> + Send;
}
