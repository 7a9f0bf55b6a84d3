//! Immutable per-user planning snapshots.
//!
//! Every operation returns a new [`SessionState`]; the host keeps the single
//! current snapshot and swaps it wholesale, so readers never observe a
//! half-applied update.

use super::error::PlannerError;
use super::notify::Notifier;
use super::resolver::{self, Outcome};
use super::search;
use super::selection::PendingSet;
use super::types::{
    ClashNotice, CommittedCourse, RecordId, SearchField, SearchResults, SessionRecord, SlotKey,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Handle for one in-flight search. Only the most recently issued ticket may
/// install its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchTicket(pub u64);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    latest_search: u64,
    results: SearchResults,
    pending: PendingSet,
    committed: Vec<CommittedCourse>,
    secondary: Vec<SessionRecord>,
}

/// What an apply did, for reporting back to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    pub accepted: Vec<CommittedCourse>,
    pub rejected: Vec<SessionRecord>,
    pub clashes: Vec<ClashNotice>,
    pub dropped: Vec<SessionRecord>,
    /// Secondary sessions sharing a cell with a committed course.
    pub overlaps: Vec<SessionRecord>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    pub fn pending(&self) -> &PendingSet {
        &self.pending
    }

    pub fn committed(&self) -> &[CommittedCourse] {
        &self.committed
    }

    pub fn secondary(&self) -> &[SessionRecord] {
        &self.secondary
    }

    pub fn is_pending(&self, id: RecordId) -> bool {
        self.pending.is_pending(id)
    }

    /// Issues a ticket for a new search. Any earlier ticket becomes stale.
    pub fn begin_search(&self) -> (Self, SearchTicket) {
        let ticket = SearchTicket(self.latest_search + 1);
        let next = Self {
            latest_search: ticket.0,
            ..self.clone()
        };
        (next, ticket)
    }

    /// Installs the results of the search identified by `ticket`, filtering
    /// `catalog` by `query` on `field`.
    ///
    /// Returns `None` if a newer search has been issued since; the stale
    /// response is discarded. Pending sessions survive a new search.
    pub fn with_search_results(
        &self,
        ticket: SearchTicket,
        catalog: &[SessionRecord],
        query: &str,
        field: SearchField,
    ) -> Option<Self> {
        if ticket.0 != self.latest_search {
            debug!(
                ticket = ticket.0,
                latest = self.latest_search,
                "Discarding stale search response"
            );
            return None;
        }

        let results = SearchResults {
            generation: ticket.0,
            query: query.to_string(),
            field,
            entries: search::filter(catalog, query, field),
        };

        Some(Self {
            results,
            ..self.clone()
        })
    }

    /// Checks or unchecks a result row.
    ///
    /// A pending id can always be unchecked, even after a newer search hid its
    /// row. Checking requires the id to name a row of the current results.
    pub fn toggle(&self, id: RecordId) -> Result<Self, PlannerError> {
        let pending = if let Some(record) = self.pending.get(id) {
            self.pending.toggle(id, record)
        } else {
            if id.generation != self.results.generation {
                return Err(PlannerError::StaleSearch {
                    requested: id.generation,
                    current: self.results.generation,
                });
            }
            let record = self
                .results
                .get(id)
                .ok_or(PlannerError::UnknownRecord { id })?;
            self.pending.toggle(id, record)
        };

        Ok(Self {
            pending,
            ..self.clone()
        })
    }

    /// Commits the pending sessions against the current grid.
    ///
    /// Rejected sessions are reported to `notifier` and removed from pending;
    /// the committed and secondary sets are replaced wholesale, even when
    /// nothing new was accepted.
    pub fn apply<N: Notifier + ?Sized>(
        &self,
        catalog: &[SessionRecord],
        notifier: &N,
    ) -> (Self, ApplyReport) {
        let records = self.pending.records();
        let previously_committed = self.committed.len();
        let resolution =
            resolver::apply_and_notify(&records, &self.committed, catalog, notifier);

        let mut rejected_ids = HashSet::new();
        let mut dropped = Vec::new();
        for (entry, outcome) in self.pending.entries().iter().zip(&resolution.outcomes) {
            match outcome {
                Outcome::Rejected => {
                    rejected_ids.insert(entry.id);
                }
                Outcome::Dropped => dropped.push(entry.record.clone()),
                Outcome::Accepted => {}
            }
        }

        let overlaps: Vec<SessionRecord> =
            resolver::secondary_overlaps(&resolution.committed, &resolution.secondary)
                .into_iter()
                .cloned()
                .collect();
        for overlap in &overlaps {
            warn!(
                course = %overlap.label(),
                slot = ?overlap.slot_key().map(|k| k.to_string()),
                "Secondary session shares a cell with a committed course"
            );
        }

        let report = ApplyReport {
            accepted: resolution.committed[previously_committed..].to_vec(),
            clashes: resolution.clash_notices(),
            rejected: resolution.rejected,
            dropped,
            overlaps,
        };

        let next = Self {
            pending: self.pending.without(&rejected_ids),
            committed: resolution.committed,
            secondary: resolution.secondary,
            ..self.clone()
        };

        (next, report)
    }

    /// Removes the committed course in cell `(day, time)`, comparing the day
    /// without case, and rebuilds the secondary set.
    pub fn remove(
        &self,
        day: &str,
        time: &str,
        catalog: &[SessionRecord],
    ) -> Result<Self, PlannerError> {
        let key = SlotKey::new(day, time);
        let index = self
            .committed
            .iter()
            .position(|c| c.slot_key() == key)
            .ok_or_else(|| PlannerError::NotCommitted {
                day: day.to_string(),
                time: time.to_string(),
            })?;

        let mut committed = self.committed.clone();
        committed.remove(index);
        let secondary = resolver::secondary_entries(&committed, catalog);

        Ok(Self {
            committed,
            secondary,
            ..self.clone()
        })
    }
}
