//! Error types for session operations that address records by id.

use super::types::RecordId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// The id does not name a row of the current search results.
    #[error("No search result with id {id}")]
    UnknownRecord { id: RecordId },

    /// The id belongs to a search that is no longer the visible one.
    #[error("Search generation {requested} is stale (current: {current})")]
    StaleSearch { requested: u64, current: u64 },

    /// No committed course occupies the requested cell.
    #[error("No committed course on {day} at {time}")]
    NotCommitted { day: String, time: String },
}
