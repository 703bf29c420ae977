use axum::http::StatusCode;
use thiserror::Error;

use crate::great_circle::GreatCircleError;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error(transparent)]
    GreatCircle(#[from] GreatCircleError),
    #[error("requested {requested} steps but at most {limit} are allowed")]
    TooManySteps { requested: usize, limit: usize },
}

impl RouteError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouteError::Gpx(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RouteError::GreatCircle(_) | RouteError::TooManySteps { .. } => StatusCode::BAD_REQUEST,
        }
    }
}
