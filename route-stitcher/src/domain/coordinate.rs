//! Coordinate and polyline value types.
//!
//! A `Polyline` always holds at least one point. The constructors enforce
//! this, so geometry code can call `first()`/`last()` without checking.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without validation.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        let coord = Self::new(latitude, longitude);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(DomainError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    /// Creates a coordinate from a wire-order `[longitude, latitude]` pair.
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    /// Returns true if both components are finite and within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// An ordered, non-empty sequence of coordinates.
///
/// Point order is the traversal direction of the physical route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a polyline from a list of points.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyPolyline` if `points` is empty.
    pub fn new(points: Vec<Coordinate>) -> Result<Self, DomainError> {
        if points.is_empty() {
            return Err(DomainError::EmptyPolyline);
        }
        Ok(Self { points })
    }

    /// Creates a single-point polyline.
    pub fn point(p: Coordinate) -> Self {
        Self { points: vec![p] }
    }

    /// Creates the straight two-point line `from -> to`.
    pub fn straight(from: Coordinate, to: Coordinate) -> Self {
        Self {
            points: vec![from, to],
        }
    }

    /// Appends a point to the end.
    pub fn push(&mut self, p: Coordinate) {
        self.points.push(p);
    }

    /// Appends every point of `other`, skipping its first point if it
    /// repeats our last point exactly.
    pub fn append(&mut self, other: &Polyline) {
        let skip = usize::from(other.first() == self.last());
        self.points.extend(other.points.iter().skip(skip).copied());
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn first(&self) -> Coordinate {
        self.points[0]
    }

    pub fn last(&self) -> Coordinate {
        self.points[self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<'de> Deserialize<'de> for Polyline {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<Coordinate>::deserialize(deserializer)?;
        Polyline::new(points).map_err(serde::de::Error::custom)
    }
}
