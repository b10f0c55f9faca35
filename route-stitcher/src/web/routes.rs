//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::planner::{PlanError, RouteOutcome};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/route/plan", post(plan_route))
        .route("/fare", get(fare_quote))
        .route("/routes", get(list_routes))
        .route("/routes/refresh", post(refresh_routes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Plan a trip between two positions.
async fn plan_route(
    State(state): State<AppState>,
    Json(req): Json<PlanRouteRequest>,
) -> Result<Json<PlanRouteResponse>, AppError> {
    let origin = req.origin.to_coordinate().map_err(|e| AppError::BadRequest {
        message: format!("Invalid origin: {e}"),
    })?;
    let destination = req
        .destination
        .to_coordinate()
        .map_err(|e| AppError::BadRequest {
            message: format!("Invalid destination: {e}"),
        })?;

    match state.composer.build_route(origin, destination).await? {
        RouteOutcome::Found(result) => {
            let fare = result.fare(&state.fares);
            Ok(Json(PlanRouteResponse::from_result(&result, fare)))
        }
        RouteOutcome::NotFound(reason) => Err(AppError::NotFound {
            message: reason.to_string(),
        }),
    }
}

/// Quote the fare for a distance.
async fn fare_quote(
    State(state): State<AppState>,
    Query(query): Query<FareQuery>,
) -> Result<Json<FareResponse>, AppError> {
    if !query.km.is_finite() || query.km < 0.0 {
        return Err(AppError::BadRequest {
            message: format!("Invalid distance: {}", query.km),
        });
    }

    let fare = state.fares.quote(query.km);
    Ok(Json(FareResponse {
        km: query.km,
        regular: fare.regular,
        discounted: fare.discounted,
    }))
}

/// List the cached route identifiers.
async fn list_routes(State(state): State<AppState>) -> Json<RoutesResponse> {
    let routes = state.corpus().load_index().await;
    Json(RoutesResponse {
        routes: routes.to_vec(),
    })
}

/// Re-read the route data, drop the corpus cache and reload the index.
async fn refresh_routes(State(state): State<AppState>) -> Result<Json<RefreshResponse>, AppError> {
    state
        .corpus()
        .refresh()
        .await
        .map_err(|e| AppError::Internal {
            message: format!("Failed to reload routes: {e}"),
        })?;

    let routes = state.corpus().load_index().await;
    Ok(Json(RefreshResponse {
        routes: routes.len(),
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
    Internal { message: String },
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Configuration(_) => AppError::Unavailable {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
