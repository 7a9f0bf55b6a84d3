//! Endpoints acting on the caller's planning session.
//!
//! The session is identified by the key the session middleware derives from
//! the request's token.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::planner::{
    Both, CollectingNotifier, PendingEntry, RecordId, SearchField, SessionRecord, SessionState,
    TracingNotifier,
};
use crate::server::types::ApiErrorType;
use crate::server::util::{generate_correlation_id, grid_json};
use crate::session::SessionKey;
use crate::types::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub field: SearchField,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub generation: u64,
    pub position: usize,
}

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub day: String,
    pub time: String,
}

/// A search result row as shown to the user.
#[derive(Debug, Serialize)]
pub struct ResultRow<'a> {
    pub id: RecordId,
    pub record: &'a SessionRecord,
    pub pending: bool,
}

fn results_json(state: &SessionState) -> serde_json::Value {
    let rows: Vec<ResultRow> = state
        .results()
        .iter()
        .map(|(id, record)| ResultRow {
            id,
            record,
            pending: state.is_pending(id),
        })
        .collect();

    json!({
        "generation": state.results().generation,
        "query": state.results().query,
        "field": state.results().field,
        "results": rows,
    })
}

fn pending_json(entries: &[PendingEntry]) -> serde_json::Value {
    json!({ "pending": entries })
}

/// POST /search
///
/// Filters the catalog and makes the result the session's visible list.
/// If a newer search of the same session finishes first, this one is
/// discarded and answered with 409.
pub async fn post_search(
    State(s): State<Arc<AppState>>,
    Extension(key): Extension<SessionKey>,
    Json(request): Json<SearchRequest>,
) -> Response {
    info!(
        session = %key,
        query = %request.query,
        field = ?request.field,
        "POST /search"
    );

    let ticket = s.sessions.begin_search(&key);

    let catalog = match s.catalog.get(false).await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(session = %key, "Failed to load catalog for search: {}", e);
            return ApiErrorType::from(e).into_response();
        }
    };

    let installed = s.sessions.update(&key, |state| {
        match state.with_search_results(ticket, &catalog, &request.query, request.field) {
            Some(next) => {
                let body = results_json(&next);
                (next, Some(body))
            }
            None => (state.clone(), None),
        }
    });

    match installed {
        Some(body) => (StatusCode::OK, Json(body)).into_response(),
        None => {
            warn!(session = %key, ticket = ticket.0, "Search superseded by a newer one");
            ApiErrorType::from((
                StatusCode::CONFLICT,
                "Search superseded by a newer search",
                None,
            ))
            .into_response()
        }
    }
}

/// POST /pending/toggle
///
/// Checks or unchecks one search result row.
pub async fn post_toggle_pending(
    State(s): State<Arc<AppState>>,
    Extension(key): Extension<SessionKey>,
    Json(request): Json<ToggleRequest>,
) -> Response {
    let id = RecordId::new(request.generation, request.position);
    info!(session = %key, id = %id, "POST /pending/toggle");

    let result = s.sessions.try_update(&key, |state| {
        let next = state.toggle(id)?;
        let body = pending_json(next.pending().entries());
        Ok::<_, crate::planner::PlannerError>((next, body))
    });

    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => {
            warn!(session = %key, "Toggle rejected: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// POST /apply
///
/// Commits the pending sessions. Clashing sessions are returned as notices
/// and removed from pending.
pub async fn post_apply(
    State(s): State<Arc<AppState>>,
    Extension(key): Extension<SessionKey>,
) -> Response {
    let correlation_id = generate_correlation_id();
    info!(correlation_id = %correlation_id, session = %key, "POST /apply");

    let catalog = match s.catalog.get(false).await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(correlation_id = %correlation_id, "Failed to load catalog for apply: {}", e);
            return ApiErrorType::from(e).into_response();
        }
    };

    let collector = CollectingNotifier::new();
    let (state, report) = s.sessions.update(&key, |state| {
        let (next, report) = state.apply(&catalog, &Both(TracingNotifier, &collector));
        (next.clone(), (next, report))
    });

    info!(
        correlation_id = %correlation_id,
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        dropped = report.dropped.len(),
        "Apply finished"
    );

    let grid = s
        .sessions
        .grid_for(&key, &state, &s.config.days, &s.config.slots);

    (
        StatusCode::OK,
        Json(json!({
            "accepted": report.accepted,
            "rejected": report.rejected,
            "clashes": collector.take(),
            "dropped": report.dropped,
            "overlaps": report.overlaps,
            "committed": state.committed(),
            "secondary": state.secondary(),
            "pending": state.pending().entries(),
            "grid": grid_json(&grid),
        })),
    )
        .into_response()
}

/// POST /committed/remove
///
/// Removes the committed course in one cell.
pub async fn post_remove_committed(
    State(s): State<Arc<AppState>>,
    Extension(key): Extension<SessionKey>,
    Json(request): Json<RemoveRequest>,
) -> Response {
    info!(session = %key, day = %request.day, time = %request.time, "POST /committed/remove");

    let catalog = match s.catalog.get(false).await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(session = %key, "Failed to load catalog for remove: {}", e);
            return ApiErrorType::from(e).into_response();
        }
    };

    let result = s.sessions.try_update(&key, |state| {
        let next = state.remove(&request.day, &request.time, &catalog)?;
        Ok::<_, crate::planner::PlannerError>((next.clone(), next))
    });

    match result {
        Ok(state) => {
            let grid = s
                .sessions
                .grid_for(&key, &state, &s.config.days, &s.config.slots);
            (
                StatusCode::OK,
                Json(json!({
                    "committed": state.committed(),
                    "secondary": state.secondary(),
                    "grid": grid_json(&grid),
                })),
            )
                .into_response()
        }
        Err(e) => {
            warn!(session = %key, "Remove rejected: {}", e);
            ApiErrorType::from(e).into_response()
        }
    }
}

/// GET /timetable
///
/// Returns the session's grid.
pub async fn get_timetable(
    State(s): State<Arc<AppState>>,
    Extension(key): Extension<SessionKey>,
) -> Response {
    let grid = s.sessions.grid(&key, &s.config.days, &s.config.slots);
    (StatusCode::OK, Json(grid_json(&grid))).into_response()
}
