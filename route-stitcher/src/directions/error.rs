//! Directions client error types.

/// Errors from the directions collaborator.
#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON deserialization failed
    #[error("JSON parse error: {message}{}", suffix(" (body: ", .body, ")"))]
    Json {
        message: String,
        body: Option<String>,
    },

    /// HTTP status was not a success
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Provider answered with a non-OK status (e.g. `ZERO_RESULTS`)
    #[error("directions status {status}{}", suffix(": ", .message, ""))]
    Status {
        status: String,
        message: Option<String>,
    },

    /// Provider rejected the API key
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Encoded polyline was malformed
    #[error("invalid encoded polyline: {0}")]
    Decode(String),

    /// Provider returned no usable path
    #[error("directions returned no path")]
    EmptyPath,

    /// Missing credentials or other configuration
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl DirectionsError {
    /// True for configuration failures, which are never degraded.
    pub fn is_configuration(&self) -> bool {
        matches!(self, DirectionsError::NotConfigured(_))
    }
}

fn suffix(open: &str, value: &Option<String>, close: &str) -> String {
    value
        .as_deref()
        .map(|v| format!("{open}{v}{close}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DirectionsError::EmptyPath;
        assert_eq!(err.to_string(), "directions returned no path");

        let err = DirectionsError::ApiError {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = DirectionsError::Status {
            status: "ZERO_RESULTS".into(),
            message: None,
        };
        assert_eq!(err.to_string(), "directions status ZERO_RESULTS");

        let err = DirectionsError::Json {
            message: "expected string".into(),
            body: Some("{}".into()),
        };
        assert_eq!(err.to_string(), "JSON parse error: expected string (body: {})");

        let err = DirectionsError::Status {
            status: "REQUEST_DENIED".into(),
            message: Some("bad key".into()),
        };
        assert_eq!(err.to_string(), "directions status REQUEST_DENIED: bad key");
    }

    #[test]
    fn non_http_errors_have_no_source() {
        use std::error::Error;

        let err = DirectionsError::NotConfigured("no key".into());
        assert!(err.source().is_none());
    }

    #[test]
    fn only_not_configured_is_configuration() {
        assert!(DirectionsError::NotConfigured("no key".into()).is_configuration());
        assert!(!DirectionsError::Unauthorized.is_configuration());
        assert!(!DirectionsError::EmptyPath.is_configuration());
    }
}
