//! Encoded polyline codec.
//!
//! Directions responses carry paths in the encoded polyline format at
//! 1e-5 degree precision, latitude first. The `polyline` crate does the
//! bit twiddling over `geo_types` coordinates (`x` is longitude).

use geo_types::Coord;

use crate::domain::{Coordinate, Polyline};

use super::error::DirectionsError;

const PRECISION: u32 = 5;

/// Decodes an encoded polyline string.
///
/// # Errors
///
/// Returns `DirectionsError::Decode` for truncated input, characters
/// outside the encoding alphabet, or coordinates out of WGS84 range, and
/// `DirectionsError::EmptyPath` for an empty string.
pub fn decode(encoded: &str) -> Result<Polyline, DirectionsError> {
    let line = ::polyline::decode_polyline(encoded.trim(), PRECISION)
        .map_err(|e| DirectionsError::Decode(e.to_string()))?;

    let mut points = Vec::with_capacity(line.0.len());
    for c in line.coords() {
        let coord = Coordinate::new(c.y, c.x);
        if !coord.is_valid() {
            return Err(DirectionsError::Decode(format!(
                "coordinate out of range: {coord}"
            )));
        }
        points.push(coord);
    }

    Polyline::new(points).map_err(|_| DirectionsError::EmptyPath)
}

/// Encodes points at 1e-5 degree precision.
///
/// # Errors
///
/// Returns `DirectionsError::Decode` if a point is out of WGS84 range.
pub fn encode(points: &[Coordinate]) -> Result<String, DirectionsError> {
    let coords = points.iter().map(|p| Coord {
        x: p.longitude,
        y: p.latitude,
    });
    ::polyline::encode_coordinates(coords, PRECISION)
        .map_err(|e| DirectionsError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

    #[test]
    fn decodes_reference_string() {
        let line = decode(REFERENCE).unwrap();
        let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];

        assert_eq!(line.len(), expected.len());
        for (p, (lat, lng)) in line.points().iter().zip(expected) {
            assert!((p.latitude - lat).abs() < 1e-9);
            assert!((p.longitude - lng).abs() < 1e-9);
        }
    }

    #[test]
    fn encodes_reference_points() {
        let points = [
            Coordinate::new(38.5, -120.2),
            Coordinate::new(40.7, -120.95),
            Coordinate::new(43.252, -126.453),
        ];
        assert_eq!(encode(&points).unwrap(), REFERENCE);
    }

    #[test]
    fn empty_input_is_empty_path() {
        assert!(matches!(decode(""), Err(DirectionsError::EmptyPath)));
        assert!(matches!(decode("   "), Err(DirectionsError::EmptyPath)));
    }

    #[test]
    fn truncated_input_rejected() {
        // Latitude without its longitude.
        assert!(matches!(decode("_p~iF"), Err(DirectionsError::Decode(_))));
    }

    #[test]
    fn invalid_character_rejected() {
        assert!(matches!(decode("_p~iF ps|U"), Err(DirectionsError::Decode(_))));
    }

    #[test]
    fn out_of_range_not_encoded() {
        assert!(matches!(
            encode(&[Coordinate::new(95.0, 0.0)]),
            Err(DirectionsError::Decode(_))
        ));
    }

    #[test]
    fn city_scale_points_survive() {
        let points = [
            Coordinate::new(7.1, 125.45),
            Coordinate::new(7.10012, 125.45031),
            Coordinate::new(7.2, 125.47),
        ];
        let line = decode(&encode(&points).unwrap()).unwrap();
        for (a, b) in line.points().iter().zip(points) {
            assert!((a.latitude - b.latitude).abs() < 1e-5);
            assert!((a.longitude - b.longitude).abs() < 1e-5);
        }
    }
}
