//! Walking legs between route pieces.
//!
//! Foot paths come from the directions collaborator. When it cannot supply
//! one, the leg degrades to a straight line so a stitched path is never
//! lost to a walking failure. Only a configuration failure is reported.

use tracing::{debug, warn};

use crate::directions::{DirectionsError, DirectionsProvider, TravelMode};
use crate::domain::{Coordinate, Polyline};

/// A walking path and whether it is a straight-line stand-in.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkingLeg {
    pub path: Polyline,
    pub degraded: bool,
}

impl WalkingLeg {
    /// The straight two-point line `from` → `to`.
    pub fn straight(from: Coordinate, to: Coordinate) -> Self {
        Self {
            path: Polyline::straight(from, to),
            degraded: true,
        }
    }
}

/// Request a walking path from `from` to `to`.
///
/// # Errors
///
/// Returns the error only when it is a configuration failure. Any other
/// failure yields [`WalkingLeg::straight`].
pub async fn walking_leg<D: DirectionsProvider>(
    provider: &D,
    from: Coordinate,
    to: Coordinate,
) -> Result<WalkingLeg, DirectionsError> {
    match provider.directions(from, to, TravelMode::Walking).await {
        Ok(path) => {
            debug!(%from, %to, points = path.len(), "walking leg");
            Ok(WalkingLeg {
                path,
                degraded: false,
            })
        }
        Err(e) if e.is_configuration() => Err(e),
        Err(e) => {
            warn!(%from, %to, error = %e, "walking directions failed, using straight line");
            Ok(WalkingLeg::straight(from, to))
        }
    }
}
