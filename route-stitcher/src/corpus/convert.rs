//! Conversion from route documents to polylines.
//!
//! Each `LineString` feature becomes one part and each line of a
//! `MultiLineString` becomes its own part. Anything else is skipped per
//! record: a bad feature never fails the whole route.

use serde_json::{Value, json};
use tracing::debug;

use crate::domain::{Coordinate, Polyline};

use super::types::{Position, RawFeature, RouteDocument};

/// Why a feature or line was skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// Feature is not a JSON object with the expected shape
    #[error("malformed feature: {0}")]
    MalformedFeature(String),

    /// Feature has no geometry
    #[error("feature has no geometry")]
    MissingGeometry,

    /// Geometry type the routing engine does not use
    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    /// Coordinates did not match the geometry type
    #[error("malformed coordinates: {0}")]
    MalformedCoordinates(String),

    /// A position was short, non-finite or out of range
    #[error("invalid position at index {0}")]
    InvalidPosition(usize),

    /// A line had no positions
    #[error("line has no positions")]
    EmptyLine,
}

/// Convert one `[lng, lat]` line to a polyline.
fn line_to_polyline(line: &[Position]) -> Result<Polyline, ConversionError> {
    let mut points = Vec::with_capacity(line.len());
    for (i, position) in line.iter().enumerate() {
        let [lng, lat, ..] = position.as_slice() else {
            return Err(ConversionError::InvalidPosition(i));
        };
        let coord = Coordinate::from_lng_lat([*lng, *lat]);
        if !coord.is_valid() {
            return Err(ConversionError::InvalidPosition(i));
        }
        points.push(coord);
    }
    Polyline::new(points).map_err(|_| ConversionError::EmptyLine)
}

/// Convert a single raw feature into zero or more polylines.
///
/// Each returned entry is either a part or the reason one line was dropped.
pub fn convert_feature(feature: &Value) -> Vec<Result<Polyline, ConversionError>> {
    let feature: RawFeature = match serde_json::from_value(feature.clone()) {
        Ok(f) => f,
        Err(e) => return vec![Err(ConversionError::MalformedFeature(e.to_string()))],
    };

    let Some(geometry) = feature.geometry else {
        return vec![Err(ConversionError::MissingGeometry)];
    };

    match geometry.kind.as_str() {
        "LineString" => match serde_json::from_value::<Vec<Position>>(geometry.coordinates) {
            Ok(line) => vec![line_to_polyline(&line)],
            Err(e) => vec![Err(ConversionError::MalformedCoordinates(e.to_string()))],
        },
        "MultiLineString" => {
            match serde_json::from_value::<Vec<Vec<Position>>>(geometry.coordinates) {
                Ok(lines) => lines.iter().map(|l| line_to_polyline(l)).collect(),
                Err(e) => vec![Err(ConversionError::MalformedCoordinates(e.to_string()))],
            }
        }
        other => vec![Err(ConversionError::UnsupportedGeometry(other.to_string()))],
    }
}

/// Convert a route document to its polyline parts, skipping bad records.
pub fn convert_route_document(route_id: &str, document: &RouteDocument) -> Vec<Polyline> {
    let mut parts = Vec::new();

    for (feature_index, feature) in document.features.iter().enumerate() {
        for result in convert_feature(feature) {
            match result {
                Ok(part) => parts.push(part),
                Err(e) => {
                    debug!(route_id, feature_index, error = %e, "skipping route geometry");
                }
            }
        }
    }

    parts
}

/// Build a route document with one `LineString` feature per part.
pub fn document_from_parts(parts: &[Polyline]) -> RouteDocument {
    let features = parts
        .iter()
        .map(|part| {
            let coordinates: Vec<[f64; 2]> = part
                .points()
                .iter()
                .map(|p| [p.longitude, p.latitude])
                .collect();
            json!({
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "LineString", "coordinates": coordinates},
            })
        })
        .collect();

    RouteDocument {
        kind: Some("FeatureCollection".to_string()),
        features,
    }
}
