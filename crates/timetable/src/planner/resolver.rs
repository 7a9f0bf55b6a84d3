//! Clash resolution: commits pending sessions to the grid first-come
//! first-served, rejects those whose cell is already taken and derives the
//! secondary meetings of every committed course.

use super::notify::Notifier;
use super::types::{ClashNotice, CommittedCourse, SessionRecord, SlotKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// What happened to one pending session during apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Committed to its cell.
    Accepted,
    /// Its cell was already occupied.
    Rejected,
    /// Missing a day or time slot; ignored.
    Dropped,
}

/// Result of resolving a batch of pending sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// The previous committed courses followed by the newly accepted ones.
    pub committed: Vec<CommittedCourse>,
    /// Pending sessions that clashed, in pending order.
    pub rejected: Vec<SessionRecord>,
    /// Other meetings of every committed course.
    pub secondary: Vec<SessionRecord>,
    /// One outcome per pending session, index-aligned with the input.
    pub outcomes: Vec<Outcome>,
}

impl Resolution {
    pub fn accepted_count(&self) -> usize {
        self.count(Outcome::Accepted)
    }

    pub fn dropped_count(&self) -> usize {
        self.count(Outcome::Dropped)
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.iter().filter(|o| **o == outcome).count()
    }

    /// One notice per rejected session.
    pub fn clash_notices(&self) -> Vec<ClashNotice> {
        self.rejected.iter().map(ClashNotice::from).collect()
    }
}

/// Resolves `pending` against the `committed` grid.
///
/// Pending sessions are processed in order. A session whose cell (lowercased
/// day, time slot) is held by a committed course or by an earlier session of
/// the same batch is rejected; otherwise it is committed. Sessions without a
/// day or time slot are dropped. The secondary set is rebuilt from scratch
/// for the resulting committed set.
///
/// Pure apart from logging: the same inputs always give the same result.
pub fn apply(
    pending: &[SessionRecord],
    committed: &[CommittedCourse],
    catalog: &[SessionRecord],
) -> Resolution {
    let mut next = committed.to_vec();
    let mut occupied: HashSet<SlotKey> = next.iter().map(CommittedCourse::slot_key).collect();
    let mut rejected = Vec::new();
    let mut outcomes = Vec::with_capacity(pending.len());

    for record in pending {
        let Some(key) = record.slot_key() else {
            warn!(
                subject = record.subject.as_deref().unwrap_or_default(),
                teacher = record.teacher.as_deref().unwrap_or_default(),
                "Dropping session with missing day or time slot"
            );
            outcomes.push(Outcome::Dropped);
            continue;
        };

        if !occupied.insert(key.clone()) {
            debug!(slot = %key, subject = ?record.subject, "Session clashes with an occupied slot");
            rejected.push(record.clone());
            outcomes.push(Outcome::Rejected);
            continue;
        }

        next.push(CommittedCourse::from_record(record));
        outcomes.push(Outcome::Accepted);
    }

    let secondary = secondary_entries(&next, catalog);

    Resolution {
        committed: next,
        rejected,
        secondary,
        outcomes,
    }
}

/// Runs [`apply`] and reports every rejected session to `notifier` before
/// returning.
pub fn apply_and_notify<N: Notifier + ?Sized>(
    pending: &[SessionRecord],
    committed: &[CommittedCourse],
    catalog: &[SessionRecord],
    notifier: &N,
) -> Resolution {
    let resolution = apply(pending, committed, catalog);
    for notice in resolution.clash_notices() {
        notifier.notify_clash(&notice);
    }
    resolution
}

/// Collects, for each committed course in order, every catalog session of
/// the same subject, teacher and class that meets at a different day or time.
///
/// Each course scans the catalog independently; the result is not
/// de-duplicated.
pub fn secondary_entries(
    committed: &[CommittedCourse],
    catalog: &[SessionRecord],
) -> Vec<SessionRecord> {
    committed
        .iter()
        .flat_map(move |course| {
            catalog
                .iter()
                .filter(move |item| item.same_course_as(course) && !item.meets_at(course))
        })
        .cloned()
        .collect()
}

/// Secondary sessions that land on a cell already held by a committed course.
///
/// Secondary sessions are not clash-checked, so these share their cell with
/// another course.
pub fn secondary_overlaps<'a>(
    committed: &[CommittedCourse],
    secondary: &'a [SessionRecord],
) -> Vec<&'a SessionRecord> {
    let occupied: HashSet<SlotKey> = committed.iter().map(CommittedCourse::slot_key).collect();
    secondary
        .iter()
        .filter(|s| s.slot_key().is_some_and(|key| occupied.contains(&key)))
        .collect()
}
