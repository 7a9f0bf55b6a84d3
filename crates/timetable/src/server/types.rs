use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::catalog::CatalogError;
use crate::planner::PlannerError;

/// JSON error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiErrorType {
    #[serde(skip)]
    status: StatusCode,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

impl From<(StatusCode, &str, Option<String>)> for ApiErrorType {
    fn from((status, error, context): (StatusCode, &str, Option<String>)) -> Self {
        Self {
            status,
            error: error.to_string(),
            context,
        }
    }
}

impl From<CatalogError> for ApiErrorType {
    fn from(e: CatalogError) -> Self {
        ApiErrorType::from((
            StatusCode::BAD_GATEWAY,
            "Session catalog unavailable",
            Some(e.to_string()),
        ))
    }
}

impl From<PlannerError> for ApiErrorType {
    fn from(e: PlannerError) -> Self {
        let (status, message) = match &e {
            PlannerError::UnknownRecord { .. } => (StatusCode::NOT_FOUND, "Unknown search result"),
            PlannerError::StaleSearch { .. } => (StatusCode::CONFLICT, "Search results are outdated"),
            PlannerError::NotCommitted { .. } => (StatusCode::NOT_FOUND, "No course in that slot"),
        };
        ApiErrorType::from((status, message, Some(e.to_string())))
    }
}

impl IntoResponse for ApiErrorType {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
