//! Route Data Store response DTOs.
//!
//! A route document is a GeoJSON-like feature collection. Features are
//! kept as raw JSON so that one malformed feature can be skipped without
//! rejecting the whole document.

use serde::{Deserialize, Serialize};

/// Geometry document for one route identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteDocument {
    /// Usually `"FeatureCollection"`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    /// Raw features, converted one at a time.
    #[serde(default)]
    pub features: Vec<serde_json::Value>,
}

/// A single feature. Only the geometry is read.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFeature {
    pub geometry: Option<RawGeometry>,
}

/// Geometry with its coordinates left unparsed until the type is known.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGeometry {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub coordinates: serde_json::Value,
}

/// A `[longitude, latitude, ...]` position; extra elements are ignored.
pub type Position = Vec<f64>;
