//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, DomainError, Fare, Polyline};
use crate::planner::{MatchTrace, PathPiece, PieceKind, PieceSource, RoutingResult};

/// A position as `{lat, lng}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Validate into a coordinate.
    pub fn to_coordinate(self) -> Result<Coordinate, DomainError> {
        Coordinate::try_new(self.lat, self.lng)
    }
}

impl From<Coordinate> for LatLng {
    fn from(c: Coordinate) -> Self {
        Self {
            lat: c.latitude,
            lng: c.longitude,
        }
    }
}

fn path_result(path: &Polyline) -> Vec<LatLng> {
    path.points().iter().copied().map(LatLng::from).collect()
}

/// Request to plan a trip.
#[derive(Debug, Deserialize)]
pub struct PlanRouteRequest {
    pub origin: LatLng,
    pub destination: LatLng,
}

/// One piece of a planned trip.
#[derive(Debug, Serialize)]
pub struct PieceResult {
    /// `transit`, `walking` or `fallback`
    pub kind: PieceKind,

    /// Route identifier for transit pieces
    pub route_id: Option<String>,

    /// Route part index for transit pieces
    pub part: Option<usize>,

    pub length_m: f64,

    pub path: Vec<LatLng>,
}

impl PieceResult {
    pub fn from_piece(piece: &PathPiece) -> Self {
        let (route_id, part) = match &piece.source {
            PieceSource::Route { route_id, part } => (Some(route_id.clone()), Some(*part)),
            PieceSource::Walking | PieceSource::DrivingFallback => (None, None),
        };

        Self {
            kind: piece.kind(),
            route_id,
            part,
            length_m: piece.length_m,
            path: path_result(&piece.path),
        }
    }
}

/// Response for a planned trip.
#[derive(Debug, Serialize)]
pub struct PlanRouteResponse {
    pub pieces: Vec<PieceResult>,

    /// All pieces joined in travel order
    pub stitched: Vec<LatLng>,

    /// The generic driving path
    pub fallback_path: Vec<LatLng>,

    pub used_fallback: bool,

    pub distance_m: f64,

    pub distance_km: f64,

    pub fare: Fare,

    pub trace: MatchTrace,

    /// RFC 3339 timestamp
    pub computed_at: String,
}

impl PlanRouteResponse {
    pub fn from_result(result: &RoutingResult, fare: Fare) -> Self {
        Self {
            pieces: result.pieces.iter().map(PieceResult::from_piece).collect(),
            stitched: path_result(&result.stitched),
            fallback_path: path_result(&result.fallback_path),
            used_fallback: result.used_fallback,
            distance_m: result.distance_m,
            distance_km: result.distance_km(),
            fare,
            trace: result.trace.clone(),
            computed_at: result.computed_at.to_rfc3339(),
        }
    }
}

/// Query for a fare quote.
#[derive(Debug, Deserialize)]
pub struct FareQuery {
    pub km: f64,
}

/// Fare quote.
#[derive(Debug, Serialize)]
pub struct FareResponse {
    pub km: f64,
    pub regular: f64,
    pub discounted: f64,
}

/// Known route identifiers.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<String>,
}

/// Result of a corpus refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Routes in the freshly loaded index
    pub routes: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
