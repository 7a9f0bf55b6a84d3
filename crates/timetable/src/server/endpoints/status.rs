//! Service status, layout and catalog endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

use crate::planner::summarize;
use crate::server::types::ApiErrorType;
use crate::types::AppState;

/// GET /health
pub async fn get_health(State(s): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "sessions": s.sessions.len(),
        })),
    )
        .into_response()
}

/// GET /layout
///
/// Returns the grid's days and slots, in display order.
pub async fn get_layout(State(s): State<Arc<AppState>>) -> Response {
    (
        StatusCode::OK,
        Json(json!({
            "days": s.config.days,
            "slots": s.config.slots,
        })),
    )
        .into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct CoursesQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// GET /courses
///
/// Returns every course in the catalog with its number of sessions.
/// `?refresh=true` bypasses the catalog cache.
pub async fn get_courses(
    State(s): State<Arc<AppState>>,
    Query(query): Query<CoursesQuery>,
) -> Response {
    info!(refresh = query.refresh, "GET /courses");

    match s.catalog.get(query.refresh).await {
        Ok(catalog) => (StatusCode::OK, Json(summarize(&catalog))).into_response(),
        Err(e) => {
            error!("Failed to load catalog for course summary: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// GET /catalog/stats
///
/// Returns catalog cache statistics for monitoring.
pub async fn get_catalog_stats(State(s): State<Arc<AppState>>) -> Response {
    (StatusCode::OK, Json(s.catalog.stats())).into_response()
}

/// POST /catalog/invalidate
///
/// Drops the cached catalog so the next request fetches it again.
pub async fn post_invalidate_catalog(State(s): State<Arc<AppState>>) -> Response {
    info!("POST /catalog/invalidate");

    s.catalog.invalidate();

    (StatusCode::OK, Json(json!({ "message": "Catalog cache invalidated" }))).into_response()
}
