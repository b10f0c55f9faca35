//! Directions API response DTOs.
//!
//! These types map directly to the provider's JSON. Only the fields the
//! engine reads are declared; everything else is ignored.

use serde::Deserialize;

/// Top-level directions response.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// `"OK"` on success; otherwise a provider status such as `"ZERO_RESULTS"`.
    pub status: String,

    /// Human-readable explanation for non-OK statuses.
    pub error_message: Option<String>,

    /// Candidate routes, best first.
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

/// One candidate route.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    /// Whole-route path in encoded polyline form.
    pub overview_polyline: Option<EncodedPolyline>,
}

/// Wrapper for an encoded polyline string.
#[derive(Debug, Clone, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

impl DirectionsResponse {
    /// The encoded path of the first route, if present.
    pub fn first_encoded_path(&self) -> Option<&str> {
        self.routes
            .first()
            .and_then(|r| r.overview_polyline.as_ref())
            .map(|p| p.points.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ok_response() {
        let json = r#"{
            "status": "OK",
            "routes": [{"overview_polyline": {"points": "_p~iF~ps|U"}, "summary": "ignored"}]
        }"#;
        let resp: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "OK");
        assert_eq!(resp.first_encoded_path(), Some("_p~iF~ps|U"));
    }

    #[test]
    fn parses_failure_without_routes() {
        let json = r#"{"status": "ZERO_RESULTS"}"#;
        let resp: DirectionsResponse = serde_json::from_str(json).unwrap();
        assert!(resp.routes.is_empty());
        assert!(resp.first_encoded_path().is_none());
    }
}
