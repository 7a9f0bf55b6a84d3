//! Projection of committed and secondary sessions onto the day x slot grid.

use super::types::{CommittedCourse, SessionRecord};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One row of the rendered grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRow {
    pub day: String,
    pub cells: Vec<String>,
}

/// A dense day x slot grid of display strings. Empty cells hold `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    days: Vec<String>,
    slots: Vec<String>,
    cells: HashMap<(String, String), String>,
}

impl Grid {
    /// Display string of the cell, or `None` if `(day, slot)` is not part of
    /// the grid's layout. Day and slot must be spelled as in the layout.
    pub fn cell(&self, day: &str, slot: &str) -> Option<&str> {
        self.cells
            .get(&(day.to_string(), slot.to_string()))
            .map(String::as_str)
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    /// Rows in day order, cells in slot order.
    pub fn rows(&self) -> Vec<GridRow> {
        self.days
            .iter()
            .map(|day| GridRow {
                day: day.clone(),
                cells: self
                    .slots
                    .iter()
                    .map(|slot| self.cell(day, slot).unwrap_or_default().to_string())
                    .collect(),
            })
            .collect()
    }

    /// Number of non-empty cells.
    pub fn filled_cells(&self) -> usize {
        self.cells.values().filter(|c| !c.is_empty()).count()
    }
}

/// Builds the grid for the given layout.
///
/// A cell starts with the committed course in it (matching day ignoring case
/// and exact time), then every secondary session for that cell is appended
/// as `"; subject (teacher) - class"` in secondary order.
pub fn project(
    committed: &[CommittedCourse],
    secondary: &[SessionRecord],
    days: &[String],
    slots: &[String],
) -> Grid {
    let mut cells = HashMap::with_capacity(days.len() * slots.len());

    for day in days {
        for slot in slots {
            let mut cell = committed
                .iter()
                .find(|c| c.is_in_cell(day, slot))
                .map(CommittedCourse::label)
                .unwrap_or_default();

            for extra in secondary.iter().filter(|s| s.is_in_cell(day, slot)) {
                cell.push_str("; ");
                cell.push_str(&extra.label());
            }

            cells.insert((day.clone(), slot.clone()), cell);
        }
    }

    Grid {
        days: days.to_vec(),
        slots: slots.to_vec(),
        cells,
    }
}

/// Digest of everything a projection depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(
        committed: &[CommittedCourse],
        secondary: &[SessionRecord],
        days: &[String],
        slots: &[String],
    ) -> Self {
        let mut hasher = Sha256::new();

        hasher.update((committed.len() as u64).to_le_bytes());
        for c in committed {
            for value in [&c.subject, &c.teacher, &c.class_name, &c.day, &c.time] {
                hash_field(&mut hasher, Some(value.as_str()));
            }
        }

        hasher.update((secondary.len() as u64).to_le_bytes());
        for s in secondary {
            for value in [&s.subject, &s.teacher, &s.class_name, &s.day, &s.time_slot] {
                hash_field(&mut hasher, value.as_deref());
            }
        }

        for labels in [days, slots] {
            hasher.update((labels.len() as u64).to_le_bytes());
            for label in labels {
                hash_field(&mut hasher, Some(label.as_str()));
            }
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Self(digest)
    }
}

/// Length-prefixed so adjacent fields cannot run into each other.
fn hash_field(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update([1u8]);
            hasher.update((v.len() as u64).to_le_bytes());
            hasher.update(v.as_bytes());
        }
        None => hasher.update([0u8]),
    }
}

/// Remembers the last projection and reuses it while its inputs are
/// unchanged. Any change to the inputs triggers a full re-projection.
#[derive(Debug, Default)]
pub struct GridCache {
    last: Mutex<Option<(Fingerprint, Arc<Grid>)>>,
}

impl GridCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_project(
        &self,
        committed: &[CommittedCourse],
        secondary: &[SessionRecord],
        days: &[String],
        slots: &[String],
    ) -> Arc<Grid> {
        let fingerprint = Fingerprint::of(committed, secondary, days, slots);

        let mut guard = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some((cached, grid)) = guard.as_ref() {
            if *cached == fingerprint {
                return grid.clone();
            }
        }

        let grid = Arc::new(project(committed, secondary, days, slots));
        *guard = Some((fingerprint, grid.clone()));
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MON_1: &str = "09:00 to 10:30";
    const WED_2: &str = "10:40 to 12:10";

    fn layout() -> (Vec<String>, Vec<String>) {
        (
            vec!["Monday".to_string(), "Wednesday".to_string()],
            vec![MON_1.to_string(), WED_2.to_string()],
        )
    }

    #[test]
    fn test_grid_is_dense() {
        let (days, slots) = layout();
        let grid = project(&[], &[], &days, &slots);

        for day in &days {
            for slot in &slots {
                assert_eq!(grid.cell(day, slot), Some(""));
            }
        }
        assert_eq!(grid.filled_cells(), 0);
    }

    #[test]
    fn test_committed_course_fills_its_cell() {
        let (days, slots) = layout();
        let committed = vec![CommittedCourse::from_record(&SessionRecord::new(
            "Math", "A", "C1", "monday", MON_1,
        ))];
        let grid = project(&committed, &[], &days, &slots);

        assert_eq!(grid.cell("Monday", MON_1), Some("Math (A) - C1"));
        assert_eq!(grid.cell("Monday", WED_2), Some(""));
    }

    #[test]
    fn test_secondary_entries_are_appended() {
        let (days, slots) = layout();
        let committed = vec![CommittedCourse::from_record(&SessionRecord::new(
            "Math", "A", "C1", "Wednesday", WED_2,
        ))];
        let secondary = vec![
            SessionRecord::new("Phy", "B", "C2", "Wednesday", WED_2),
            SessionRecord::new("Chem", "C", "C3", "Wednesday", WED_2),
        ];
        let grid = project(&committed, &secondary, &days, &slots);

        assert_eq!(
            grid.cell("Wednesday", WED_2),
            Some("Math (A) - C1; Phy (B) - C2; Chem (C) - C3")
        );
    }

    #[test]
    fn test_secondary_alone_keeps_leading_separator() {
        let (days, slots) = layout();
        let secondary = vec![SessionRecord::new("Phy", "B", "C2", "Wednesday", WED_2)];
        let grid = project(&[], &secondary, &days, &slots);

        assert_eq!(grid.cell("Wednesday", WED_2), Some("; Phy (B) - C2"));
    }

    #[test]
    fn test_rows_follow_layout_order() {
        let (days, slots) = layout();
        let secondary = vec![SessionRecord::new("Phy", "B", "C2", "Wednesday", WED_2)];
        let rows = project(&[], &secondary, &days, &slots).rows();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].day, "Monday");
        assert_eq!(rows[1].cells, vec!["".to_string(), "; Phy (B) - C2".to_string()]);
    }

    #[test]
    fn test_cache_reuses_until_inputs_change() {
        let (days, slots) = layout();
        let cache = GridCache::new();
        let committed = vec![CommittedCourse::from_record(&SessionRecord::new(
            "Math", "A", "C1", "Monday", MON_1,
        ))];

        let first = cache.get_or_project(&committed, &[], &days, &slots);
        let second = cache.get_or_project(&committed, &[], &days, &slots);
        assert!(Arc::ptr_eq(&first, &second));

        let third = cache.get_or_project(&[], &[], &days, &slots);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.cell("Monday", MON_1), Some(""));
    }

    #[test]
    fn test_fingerprint_separates_field_boundaries() {
        let (days, slots) = layout();
        let a = vec![SessionRecord::new("ab", "c", "", "Monday", MON_1)];
        let b = vec![SessionRecord::new("a", "bc", "", "Monday", MON_1)];

        assert_ne!(
            Fingerprint::of(&[], &a, &days, &slots),
            Fingerprint::of(&[], &b, &days, &slots)
        );
    }
}
