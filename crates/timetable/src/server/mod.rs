use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware as mw, Router};

use crate::server::endpoints::{planner, status};
use crate::server::middleware::session_validator;
use crate::types::AppState;

mod endpoints;
mod middleware;
mod types;
mod util;

pub use middleware::SESSION_HEADER;

/// Creates a router that can be used by `axum`.
///
/// # Parameters
/// - `app_state`: The app server state.
///
/// # Returns
/// The router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Router whose endpoints act on the caller's planning session
    let session_router = Router::new()
        .route("/search", post(planner::post_search))
        .route("/pending/toggle", post(planner::post_toggle_pending))
        .route("/apply", post(planner::post_apply))
        .route("/committed/remove", post(planner::post_remove_committed))
        .route("/timetable", get(planner::get_timetable))
        .layer(mw::from_fn(session_validator::require_session_token));

    Router::new()
        .route("/health", get(status::get_health))
        .route("/layout", get(status::get_layout))
        .route("/courses", get(status::get_courses))
        .route("/catalog/stats", get(status::get_catalog_stats))
        .route("/catalog/invalidate", post(status::post_invalidate_catalog))
        .merge(session_router)
        .with_state(app_state)
}
