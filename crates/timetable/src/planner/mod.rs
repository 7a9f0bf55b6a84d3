/// Timetable planning: search, selection, clash resolution and grid projection
mod error;
mod grid;
mod notify;
mod resolver;
mod search;
mod selection;
mod state;
mod summary;
mod types;

pub use error::PlannerError;
pub use grid::{project, Fingerprint, Grid, GridCache, GridRow};
pub use notify::{Both, CollectingNotifier, Notifier, TracingNotifier};
pub use resolver::{
    apply, apply_and_notify, secondary_entries, secondary_overlaps, Outcome, Resolution,
};
pub use search::filter;
pub use selection::{PendingEntry, PendingSet};
pub use state::{ApplyReport, SearchTicket, SessionState};
pub use summary::{summarize, CourseSummary};
pub use types::*;
