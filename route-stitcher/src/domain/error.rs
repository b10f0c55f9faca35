//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from collaborator/IO errors.

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// A polyline was constructed with no points
    #[error("polyline must have at least one point")]
    EmptyPolyline,

    /// Latitude/longitude outside WGS84 bounds or not finite
    #[error("invalid coordinate: ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
}
