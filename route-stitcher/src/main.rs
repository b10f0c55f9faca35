use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use route_stitcher::cache::{CorpusCacheConfig, RouteCorpusCache};
use route_stitcher::corpus::{MockRouteStore, RouteSource, RouteStoreClient, RouteStoreConfig};
use route_stitcher::directions::{DirectionsClient, DirectionsConfig};
use route_stitcher::domain::FareSchedule;
use route_stitcher::planner::{MatchConfig, RouteComposer};
use route_stitcher::web::{AppState, create_router};

/// Default route store when neither a URL nor a local directory is given.
const DEFAULT_ROUTE_STORE_URL: &str = "http://127.0.0.1:8080/";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("route_stitcher=info,tower_http=info")),
        )
        .init();

    let api_key = std::env::var("DIRECTIONS_API_KEY").unwrap_or_else(|_| {
        warn!("DIRECTIONS_API_KEY not set; route planning will fail");
        String::new()
    });
    let mut directions_config = DirectionsConfig::new(api_key);
    if let Ok(url) = std::env::var("DIRECTIONS_BASE_URL") {
        directions_config = directions_config.with_base_url(url);
    }
    let directions = DirectionsClient::new(directions_config)?;

    let source = match std::env::var("ROUTE_DATA_DIR") {
        Ok(dir) => {
            info!(%dir, "loading routes from local directory");
            RouteSource::Mock(MockRouteStore::new(&dir)?)
        }
        Err(_) => {
            let url = std::env::var("ROUTE_STORE_URL")
                .unwrap_or_else(|_| DEFAULT_ROUTE_STORE_URL.to_string());
            let mut config = RouteStoreConfig::new(&url);
            if let Ok(key) = std::env::var("ROUTE_STORE_API_KEY") {
                config = config.with_api_key(key);
            }
            info!(%url, "using remote route store");
            RouteSource::Http(RouteStoreClient::new(config)?)
        }
    };

    let kind = source.kind();
    let cache = RouteCorpusCache::new(source, &CorpusCacheConfig::default());
    let routes = cache.load_index().await;
    info!(source = kind, routes = routes.len(), "route index loaded");

    let composer = RouteComposer::new(Arc::new(cache), directions, MatchConfig::default());
    let state = AppState::new(composer, FareSchedule::default());
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    info!(%addr, "route stitcher listening");
    info!("  GET  /health          - Health check");
    info!("  POST /route/plan      - Plan a trip");
    info!("  GET  /fare?km=        - Quote a fare");
    info!("  GET  /routes          - List route identifiers");
    info!("  POST /routes/refresh  - Reload the route corpus");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
