/// Pending selection: sessions checked by the user but not yet applied
use super::types::{RecordId, SessionRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A pending session together with the result row it was checked on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEntry {
    pub id: RecordId,
    pub record: SessionRecord,
}

/// Set of pending sessions keyed by [`RecordId`].
///
/// Membership is by id, not by value, so two identical catalog rows can be
/// checked independently. Insertion order is kept because apply processes
/// sessions in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSet {
    entries: Vec<PendingEntry>,
}

impl PendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new set with `id` removed if present, or added otherwise.
    pub fn toggle(&self, id: RecordId, record: &SessionRecord) -> Self {
        let mut entries = self.entries.clone();
        if let Some(index) = entries.iter().position(|e| e.id == id) {
            entries.remove(index);
        } else {
            entries.push(PendingEntry {
                id,
                record: record.clone(),
            });
        }
        Self { entries }
    }

    pub fn is_pending(&self, id: RecordId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: RecordId) -> Option<&SessionRecord> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| &e.record)
    }

    /// Returns a new set without the given ids.
    pub fn without(&self, ids: &HashSet<RecordId>) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| !ids.contains(&e.id))
                .cloned()
                .collect(),
        }
    }

    /// Pending records in the order they were checked.
    pub fn records(&self) -> Vec<SessionRecord> {
        self.entries.iter().map(|e| e.record.clone()).collect()
    }

    pub fn entries(&self) -> &[PendingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SessionRecord {
        SessionRecord::new("Math", "A", "C1", "Monday", "09:00 to 10:30")
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let id = RecordId::new(1, 0);
        let empty = PendingSet::new();

        let checked = empty.toggle(id, &record());
        assert!(checked.is_pending(id));
        assert!(!empty.is_pending(id));

        let unchecked = checked.toggle(id, &record());
        assert!(!unchecked.is_pending(id));
        assert!(unchecked.is_empty());
    }

    #[test]
    fn test_identical_records_are_distinct_members() {
        let set = PendingSet::new()
            .toggle(RecordId::new(1, 0), &record())
            .toggle(RecordId::new(1, 1), &record());

        assert_eq!(set.len(), 2);

        let set = set.toggle(RecordId::new(1, 0), &record());
        assert_eq!(set.len(), 1);
        assert!(set.is_pending(RecordId::new(1, 1)));
    }

    #[test]
    fn test_records_keep_check_order() {
        let later = SessionRecord::new("Phy", "B", "C2", "Tuesday", "10:40 to 12:10");
        let set = PendingSet::new()
            .toggle(RecordId::new(1, 3), &later)
            .toggle(RecordId::new(1, 0), &record());

        assert_eq!(set.records(), vec![later, record()]);
    }

    #[test]
    fn test_without_removes_only_named_ids() {
        let set = PendingSet::new()
            .toggle(RecordId::new(1, 0), &record())
            .toggle(RecordId::new(1, 1), &record());
        let removed: HashSet<_> = [RecordId::new(1, 0)].into_iter().collect();

        let rest = set.without(&removed);
        assert_eq!(rest.len(), 1);
        assert!(rest.is_pending(RecordId::new(1, 1)));
    }
}
