pub mod config;
pub mod error;
pub mod gpx_export;
pub mod great_circle;
pub mod models;
pub mod region;
pub mod routing;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use tower_http::cors::{Any, CorsLayer};

pub use crate::great_circle::{GreatCircleError, interpolate};

use crate::error::RouteError;
use crate::models::{ApiError, GreatCircleRequest, GreatCircleResponse};
use crate::routing::{RouteLimits, great_circle_route};

#[derive(Clone)]
pub struct AppState {
    pub limits: RouteLimits,
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/great-circle", post(great_circle_handler))
        .layer(cors)
        .with_state(state)
}

async fn great_circle_handler(
    State(state): State<AppState>,
    payload: Result<Json<GreatCircleRequest>, JsonRejection>,
) -> Result<Json<GreatCircleResponse>, (StatusCode, Json<ApiError>)> {
    // Bodies that fail to deserialize (a negative step count, a missing
    // coordinate) are invalid input like any other, not a 422.
    let Json(req) = payload.map_err(bad_request_body)?;
    tracing::info!(
        "great-circle request: {} -> {} ({} steps)",
        req.start,
        req.end,
        req.steps
    );

    let response = great_circle_route(&req, &state.limits).map_err(error_response)?;
    Ok(Json(response))
}

fn bad_request_body(rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    tracing::warn!("rejected great-circle request body: {rejection}");
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            message: rejection.body_text(),
        }),
    )
}

fn error_response(err: RouteError) -> (StatusCode, Json<ApiError>) {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("great-circle request failed: {err}");
    } else {
        tracing::warn!("rejected great-circle request: {err}");
    }
    (
        status,
        Json(ApiError {
            message: err.to_string(),
        }),
    )
}
