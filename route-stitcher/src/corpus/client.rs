//! Route Data Store HTTP client.

use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::error::CorpusError;
use super::types::RouteDocument;
use super::RouteStore;

/// Configuration for the Route Data Store client.
#[derive(Debug, Clone)]
pub struct RouteStoreConfig {
    /// Base URL; the index lives at `{base}/routes.json`
    pub base_url: String,
    /// Optional API key for x-apikey header authentication
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl RouteStoreConfig {
    /// Create a new config for the store at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: 30,
        }
    }

    /// Authenticate requests with an API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the Route Data Store.
#[derive(Debug, Clone)]
pub struct RouteStoreClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RouteStoreClient {
    /// Create a new Route Data Store client.
    pub fn new(config: RouteStoreConfig) -> Result<Self, CorpusError> {
        let mut headers = HeaderMap::new();

        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key).map_err(|_| CorpusError::Api {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
            headers.insert(HeaderName::from_static("x-apikey"), value);
        }

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CorpusError::InvalidUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(CorpusError::InvalidUrl(config.base_url));
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// URL of `{base}/{segments...}` with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, CorpusError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CorpusError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn index_url(&self) -> Result<Url, CorpusError> {
        self.url(&["routes.json"])
    }

    pub(crate) fn route_url(&self, route_id: &str) -> Result<Url, CorpusError> {
        self.url(&["routes", &format!("{route_id}.geojson")])
    }

    /// GET a JSON body and deserialize it.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        route_id: Option<&str>,
    ) -> Result<T, CorpusError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(CorpusError::Unauthorized);
        }

        if status == reqwest::StatusCode::NOT_FOUND
            && let Some(id) = route_id
        {
            return Err(CorpusError::RouteNotFound(id.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CorpusError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| CorpusError::Json {
            message: e.to_string(),
        })
    }

    /// Fetch the list of route identifiers.
    pub async fn fetch_index(&self) -> Result<Vec<String>, CorpusError> {
        self.get_json(self.index_url()?, None).await
    }

    /// Fetch the geometry document for one route.
    pub async fn fetch_route(&self, route_id: &str) -> Result<RouteDocument, CorpusError> {
        self.get_json(self.route_url(route_id)?, Some(route_id)).await
    }
}

impl RouteStore for RouteStoreClient {
    async fn fetch_index(&self) -> Result<Vec<String>, CorpusError> {
        RouteStoreClient::fetch_index(self).await
    }

    async fn fetch_route(&self, route_id: &str) -> Result<RouteDocument, CorpusError> {
        RouteStoreClient::fetch_route(self, route_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = RouteStoreConfig::new("https://example.com/data");
        assert_eq!(config.base_url, "https://example.com/data");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_builders() {
        let config = RouteStoreConfig::new("https://example.com")
            .with_api_key("secret")
            .with_timeout(5);
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn builds_urls() {
        let client = RouteStoreClient::new(RouteStoreConfig::new("https://example.com/data/")).unwrap();

        assert_eq!(
            client.index_url().unwrap().as_str(),
            "https://example.com/data/routes.json"
        );
        assert_eq!(
            client.route_url("Route 7").unwrap().as_str(),
            "https://example.com/data/routes/Route%207.geojson"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(matches!(
            RouteStoreClient::new(RouteStoreConfig::new("not a url")),
            Err(CorpusError::InvalidUrl(_))
        ));
        assert!(matches!(
            RouteStoreClient::new(RouteStoreConfig::new("mailto:someone@example.com")),
            Err(CorpusError::InvalidUrl(_))
        ));
    }
}
