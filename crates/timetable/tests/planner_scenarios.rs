use std::collections::HashSet;

use timetable::catalog::{CatalogProvider, FileCatalogProvider};
use timetable::planner::{
    apply, filter, project, summarize, CollectingNotifier, CommittedCourse, RecordId, SearchField,
    SessionRecord, SessionState,
};

const MON_1: &str = "09:00 to 10:30";
const WED_2: &str = "10:40 to 12:10";

fn days() -> Vec<String> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn slots() -> Vec<String> {
    [MON_1, WED_2].into_iter().map(String::from).collect()
}

#[test]
fn test_single_pending_session_is_committed() {
    let pending = vec![SessionRecord::new("Math", "A", "C1", "Monday", MON_1)];

    let resolution = apply(&pending, &[], &[]);

    assert_eq!(resolution.committed.len(), 1);
    assert_eq!(resolution.committed[0].day, "Monday");
    assert_eq!(resolution.committed[0].time, MON_1);
    assert!(resolution.rejected.is_empty());
}

#[test]
fn test_same_slot_in_one_batch_rejects_the_second() {
    let pending = vec![
        SessionRecord::new("Math", "A", "C1", "Monday", MON_1),
        SessionRecord::new("Phy", "B", "C2", "Monday", MON_1),
    ];

    let resolution = apply(&pending, &[], &[]);

    assert_eq!(resolution.committed[0].subject, "Math");
    assert_eq!(resolution.rejected, vec![pending[1].clone()]);
}

#[test]
fn test_occupied_slot_rejects_new_subject() {
    let committed = vec![CommittedCourse {
        subject: "X".to_string(),
        teacher: "T".to_string(),
        class_name: "K".to_string(),
        day: "Monday".to_string(),
        time: MON_1.to_string(),
    }];
    let pending = vec![SessionRecord::new("Y", "B", "C2", "Monday", MON_1)];

    let resolution = apply(&pending, &committed, &[]);

    assert_eq!(resolution.committed, committed);
    assert_eq!(resolution.rejected, pending);
}

#[test]
fn test_secondary_meeting_is_shown_in_its_cell() {
    let monday = SessionRecord::new("Phy", "B", "C2", "Monday", MON_1);
    let wednesday = SessionRecord::new("Phy", "B", "C2", "Wednesday", WED_2);
    let catalog = vec![monday.clone(), wednesday.clone()];

    let resolution = apply(&[monday], &[], &catalog);
    assert_eq!(resolution.secondary, vec![wednesday]);

    let grid = project(&resolution.committed, &resolution.secondary, &days(), &slots());
    assert_eq!(grid.cell("Monday", MON_1), Some("Phy (B) - C2"));
    assert_eq!(grid.cell("Wednesday", WED_2), Some("; Phy (B) - C2"));
    assert_eq!(grid.cell("Friday", MON_1), Some(""));
}

#[test]
fn test_session_without_time_slot_is_dropped() {
    let pending = vec![SessionRecord {
        time_slot: None,
        ..SessionRecord::new("Math", "A", "C1", "Monday", MON_1)
    }];

    let resolution = apply(&pending, &[], &[]);

    assert!(resolution.committed.is_empty());
    assert!(resolution.rejected.is_empty());
}

#[test]
fn test_no_cell_is_ever_double_booked() {
    let pending = vec![
        SessionRecord::new("Math", "A", "C1", "Monday", MON_1),
        SessionRecord::new("Phy", "B", "C2", "monday", MON_1),
        SessionRecord::new("Chem", "C", "C3", "Monday", WED_2),
        SessionRecord::new("Bio", "D", "C4", "MONDAY", WED_2),
        SessionRecord::new("Art", "E", "C5", "Tuesday", MON_1),
    ];

    let first = apply(&pending[..3], &[], &[]);
    let second = apply(&pending[3..], &first.committed, &[]);

    let keys: HashSet<_> = second.committed.iter().map(|c| c.slot_key()).collect();
    assert_eq!(keys.len(), second.committed.len());
    assert_eq!(second.committed.len(), 3);
}

#[test]
fn test_full_session_flow() {
    let catalog = vec![
        SessionRecord::new("Math", "A", "C1", "Monday", MON_1),
        SessionRecord::new("Phy", "B", "C2", "Monday", MON_1),
        SessionRecord::new("Phy", "B", "C2", "Wednesday", WED_2),
    ];

    let (state, ticket) = SessionState::new().begin_search();
    let state = state
        .with_search_results(ticket, &catalog, "phy", SearchField::Subject)
        .unwrap();
    let phy = RecordId::new(state.results().generation, 0);
    let state = state.toggle(phy).unwrap();

    let notifier = CollectingNotifier::new();
    let (state, report) = state.apply(&catalog, &notifier);
    assert_eq!(report.accepted.len(), 1);
    assert!(notifier.take().is_empty());

    // only rejected sessions leave pending; uncheck the accepted one
    assert!(state.is_pending(phy));
    let state = state.toggle(phy).unwrap();

    // Math now clashes with the committed Phy session
    let (state, ticket) = state.begin_search();
    let state = state
        .with_search_results(ticket, &catalog, "math", SearchField::Subject)
        .unwrap();
    let math = RecordId::new(state.results().generation, 0);
    let state = state.toggle(math).unwrap();
    let (state, report) = state.apply(&catalog, &notifier);

    assert_eq!(report.rejected.len(), 1);
    assert_eq!(notifier.take()[0].subject, "Math");
    assert!(!state.is_pending(math));
    assert_eq!(state.committed().len(), 1);
    assert_eq!(state.secondary().len(), 1);
}

#[tokio::test]
async fn test_bundled_catalog_loads_and_searches() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/timetable.json");
    let catalog = FileCatalogProvider::new(path).fetch().await.unwrap();

    let results = filter(&catalog, "programming", SearchField::Subject);
    assert_eq!(results.len(), 2);

    let summaries = summarize(&catalog);
    let programming = summaries
        .iter()
        .find(|s| s.subject == "Programming Fundamentals")
        .unwrap();
    assert_eq!(programming.sessions, 3);
}
