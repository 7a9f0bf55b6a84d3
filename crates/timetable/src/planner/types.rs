/// Types for timetable planning
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which field of a session a search query is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    Subject,
    Teacher,
}

/// One scheduled occurrence of a course, as supplied by the catalog.
///
/// Every field is optional because catalog documents are not trusted to be
/// complete. Records missing a day or time slot can be searched and selected
/// but are dropped when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<String>,
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_slot: Option<String>,
}

impl SessionRecord {
    /// Creates a fully populated record.
    pub fn new(
        subject: impl Into<String>,
        teacher: impl Into<String>,
        class_name: impl Into<String>,
        day: impl Into<String>,
        time_slot: impl Into<String>,
    ) -> Self {
        Self {
            subject: Some(subject.into()),
            teacher: Some(teacher.into()),
            class_name: Some(class_name.into()),
            day: Some(day.into()),
            time_slot: Some(time_slot.into()),
        }
    }

    /// Returns the value of the searchable field, if present.
    pub fn field(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::Subject => self.subject.as_deref(),
            SearchField::Teacher => self.teacher.as_deref(),
        }
    }

    /// Returns the grid cell this record targets.
    ///
    /// `None` when the day or time slot is missing or empty.
    pub fn slot_key(&self) -> Option<SlotKey> {
        let day = self.day.as_deref().filter(|d| !d.is_empty())?;
        let time = self.time_slot.as_deref().filter(|t| !t.is_empty())?;
        Some(SlotKey::new(day, time))
    }

    /// True if this record belongs to the same course (subject, teacher and
    /// class) as the committed course.
    pub fn same_course_as(&self, course: &CommittedCourse) -> bool {
        self.subject.as_deref().unwrap_or_default() == course.subject
            && self.teacher.as_deref().unwrap_or_default() == course.teacher
            && self.class_name.as_deref().unwrap_or_default() == course.class_name
    }

    /// True if this record meets at exactly the committed course's day and time.
    ///
    /// Exact comparison, matching how the catalog spells the course's own slot.
    pub fn meets_at(&self, course: &CommittedCourse) -> bool {
        self.day.as_deref() == Some(course.day.as_str())
            && self.time_slot.as_deref() == Some(course.time.as_str())
    }

    /// True if this record falls in the grid cell `(day, slot)`.
    pub fn is_in_cell(&self, day: &str, slot: &str) -> bool {
        match (&self.day, &self.time_slot) {
            (Some(d), Some(t)) => d.to_lowercase() == day.to_lowercase() && t == slot,
            _ => false,
        }
    }

    /// Display label used in grid cells.
    pub fn label(&self) -> String {
        format!(
            "{} ({}) - {}",
            self.subject.as_deref().unwrap_or_default(),
            self.teacher.as_deref().unwrap_or_default(),
            self.class_name.as_deref().unwrap_or_default()
        )
    }
}

/// A session accepted into the grid. Occupies exactly one (day, time) cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommittedCourse {
    pub subject: String,
    pub teacher: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub day: String,
    pub time: String,
}

impl CommittedCourse {
    /// Builds the canonical committed form of a record. Missing text fields
    /// become empty strings.
    pub fn from_record(record: &SessionRecord) -> Self {
        Self {
            subject: record.subject.clone().unwrap_or_default(),
            teacher: record.teacher.clone().unwrap_or_default(),
            class_name: record.class_name.clone().unwrap_or_default(),
            day: record.day.clone().unwrap_or_default(),
            time: record.time_slot.clone().unwrap_or_default(),
        }
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey::new(&self.day, &self.time)
    }

    /// True if this course occupies the grid cell `(day, slot)`.
    pub fn is_in_cell(&self, day: &str, slot: &str) -> bool {
        self.day.to_lowercase() == day.to_lowercase() && self.time == slot
    }

    /// Display label used in grid cells.
    pub fn label(&self) -> String {
        format!("{} ({}) - {}", self.subject, self.teacher, self.class_name)
    }
}

/// A grid cell identity: lowercased day plus the exact time slot label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    pub day: String,
    pub time: String,
}

impl SlotKey {
    pub fn new(day: &str, time: &str) -> Self {
        Self {
            day: day.to_lowercase(),
            time: time.to_string(),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.time)
    }
}

/// Stable identifier of a search result row: the search generation that
/// produced it and its position within that result list.
///
/// Two field-identical catalog entries shown as separate rows get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    pub generation: u64,
    pub position: usize,
}

impl RecordId {
    pub fn new(generation: u64, position: usize) -> Self {
        Self {
            generation,
            position,
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.generation, self.position)
    }
}

/// The visible result list of the latest completed search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub generation: u64,
    pub query: String,
    pub field: SearchField,
    pub entries: Vec<SessionRecord>,
}

impl SearchResults {
    /// Looks up a row by id. Ids from another generation never resolve.
    pub fn get(&self, id: RecordId) -> Option<&SessionRecord> {
        if id.generation != self.generation {
            return None;
        }
        self.entries.get(id.position)
    }

    /// Iterates rows together with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &SessionRecord)> {
        let generation = self.generation;
        self.entries
            .iter()
            .enumerate()
            .map(move |(position, record)| (RecordId::new(generation, position), record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// User-facing notice for one session rejected because its slot is taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashNotice {
    pub subject: String,
    pub teacher: String,
    #[serde(rename = "class")]
    pub class_name: String,
}

impl From<&SessionRecord> for ClashNotice {
    fn from(record: &SessionRecord) -> Self {
        Self {
            subject: record.subject.clone().unwrap_or_default(),
            teacher: record.teacher.clone().unwrap_or_default(),
            class_name: record.class_name.clone().unwrap_or_default(),
        }
    }
}

impl fmt::Display for ClashNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Clash detected! The selected course \"{}\" for the teacher \"{}\" and class \"{}\" overlaps with another course in the timetable.",
            self.subject, self.teacher, self.class_name
        )
    }
}
