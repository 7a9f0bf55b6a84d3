//! Catalog search: case-insensitive substring filtering with de-duplication.

use super::types::{SearchField, SessionRecord};
use std::collections::HashSet;

/// Filters the catalog down to the records whose `field` contains `query`,
/// ignoring case.
///
/// Records lacking the searched field never match. An empty query matches
/// every record that has the field. Records equal on all five fields are
/// reported once, at the position of their first occurrence.
pub fn filter(catalog: &[SessionRecord], query: &str, field: SearchField) -> Vec<SessionRecord> {
    let needle = query.to_lowercase();
    let mut seen: HashSet<&SessionRecord> = HashSet::new();

    catalog
        .iter()
        .filter(|record| {
            record
                .field(field)
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        })
        .filter(|record| seen.insert(*record))
        .cloned()
        .collect()
}
