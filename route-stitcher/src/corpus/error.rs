//! Route Data Store error types.

/// Errors that can occur when interacting with the Route Data Store.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check ROUTE_STORE_API_KEY")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The store has no route with this identifier
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// Base URL could not be used to build request URLs
    #[error("invalid store URL: {0}")]
    InvalidUrl(String),

    /// Local data could not be read
    #[error("I/O error: {message}")]
    Io { message: String },
}
