//! Directions HTTP client.
//!
//! Requests driving or walking paths between two coordinates and decodes
//! the encoded polyline in the response.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Coordinate, Polyline};

use super::error::DirectionsError;
use super::polyline::decode;
use super::types::DirectionsResponse;
use super::{DirectionsProvider, TravelMode};

/// Default base URL for the directions API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the directions client.
#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Directions API client.
///
/// Uses a semaphore to limit concurrent requests.
#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl DirectionsClient {
    /// Create a new client with the given configuration.
    ///
    /// An empty API key is accepted here; every request then fails with
    /// `DirectionsError::NotConfigured`.
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Request a path from `origin` to `destination`.
    pub async fn get_directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Polyline, DirectionsError> {
        if self.api_key.is_empty() {
            return Err(DirectionsError::NotConfigured(
                "DIRECTIONS_API_KEY is not set".to_string(),
            ));
        }

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DirectionsError::ApiError {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        debug!(%origin, %destination, mode = mode.as_str(), "requesting directions");

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("origin", format_coordinate(origin)),
                ("destination", format_coordinate(destination)),
                ("mode", mode.as_str().to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(DirectionsError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectionsError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: DirectionsResponse =
            serde_json::from_str(&body).map_err(|e| DirectionsError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        path_from_response(&parsed)
    }
}

impl DirectionsProvider for DirectionsClient {
    async fn directions(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> Result<Polyline, DirectionsError> {
        self.get_directions(origin, destination, mode).await
    }
}

/// `lat,lng` as the API expects it.
fn format_coordinate(c: Coordinate) -> String {
    format!("{:.6},{:.6}", c.latitude, c.longitude)
}

/// Extract and decode the first route's path.
pub fn path_from_response(response: &DirectionsResponse) -> Result<Polyline, DirectionsError> {
    match response.status.as_str() {
        "OK" => {}
        "REQUEST_DENIED" => return Err(DirectionsError::Unauthorized),
        other => {
            return Err(DirectionsError::Status {
                status: other.to_string(),
                message: response.error_message.clone(),
            });
        }
    }

    let encoded = response
        .first_encoded_path()
        .ok_or(DirectionsError::EmptyPath)?;
    decode(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> DirectionsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = DirectionsConfig::new("test-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_builders() {
        let config = DirectionsConfig::new("k")
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(2)
            .with_timeout(5);
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.timeout_secs, 5);
    }

    #[tokio::test]
    async fn empty_key_is_not_configured() {
        let client = DirectionsClient::new(DirectionsConfig::new("")).unwrap();
        let result = client
            .get_directions(
                Coordinate::new(7.1, 125.45),
                Coordinate::new(7.2, 125.47),
                TravelMode::Driving,
            )
            .await;
        assert!(matches!(result, Err(DirectionsError::NotConfigured(_))));
    }

    #[test]
    fn ok_response_decodes() {
        let resp = response(
            r#"{"status": "OK", "routes": [{"overview_polyline": {"points": "_p~iF~ps|U_ulLnnqC"}}]}"#,
        );
        let path = path_from_response(&resp).unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn zero_results_is_status_error() {
        let resp = response(r#"{"status": "ZERO_RESULTS", "routes": []}"#);
        assert!(matches!(
            path_from_response(&resp),
            Err(DirectionsError::Status { status, .. }) if status == "ZERO_RESULTS"
        ));
    }

    #[test]
    fn request_denied_is_unauthorized() {
        let resp = response(r#"{"status": "REQUEST_DENIED", "error_message": "bad key"}"#);
        assert!(matches!(
            path_from_response(&resp),
            Err(DirectionsError::Unauthorized)
        ));
    }

    #[test]
    fn ok_without_routes_is_empty() {
        let resp = response(r#"{"status": "OK", "routes": []}"#);
        assert!(matches!(
            path_from_response(&resp),
            Err(DirectionsError::EmptyPath)
        ));
    }

    #[test]
    fn corrupt_polyline_is_decode_error() {
        let resp =
            response(r#"{"status": "OK", "routes": [{"overview_polyline": {"points": "_p~"}}]}"#);
        assert!(matches!(
            path_from_response(&resp),
            Err(DirectionsError::Decode(_))
        ));
    }

    #[test]
    fn coordinate_formatting() {
        assert_eq!(
            format_coordinate(Coordinate::new(7.1, 125.45)),
            "7.100000,125.450000"
        );
    }
}
